/*!
Platform Adapter contract (spec §6.1) and a test-only in-memory
implementation.
*/

mod traits;

pub mod mock;

pub use traits::{
  ActionPerformer, Clipboard, ImageFormat, Inputter, MouseButton, PlatformAdapter, Reader,
  Screenshotter, ValueSetter, WindowFilter, WindowManager, WritableAttribute,
};
