pub mod artifact;
pub mod clipboard;
pub mod notifier;
pub mod replacement;

pub use artifact::{extract_filename, resolve, resolve_binary, resolve_text_batch};
pub use clipboard::{ClipboardWriter, SystemClipboard};
pub use notifier::{LogNotifier, Notice, NoticeLevel, Notifier, RecordingNotifier};
pub use replacement::{
    build_map, build_map_for_selection, select_policy, PolicySelection, ReplacementMap,
    ReplacementPolicy,
};
