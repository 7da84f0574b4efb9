//! 编辑流程服务层

mod editor;
mod editor_state;
mod form_buffer;

pub use editor::Editor;
pub use editor_state::{EditorState, OperationKind, OperationTicket};
pub use form_buffer::FormBuffer;
