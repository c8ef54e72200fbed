mod input;
mod note_form;

pub use input::{InputResult, TextInput};
pub use note_form::{FormEvent, NoteForm};
