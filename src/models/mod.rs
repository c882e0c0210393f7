pub mod media;
pub mod tool;

pub use media::{Folder, FolderContents, MediaFile};
pub use tool::{ActiveTool, ToolbarControls};
