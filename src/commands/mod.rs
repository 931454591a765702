// Command Families - callers of the kernel
//
// Each family reads entities through `AttributeSource`, runs the kernel, and
// returns plain data for the host to write back under its own transaction.

pub mod room_numbering;
pub mod color_splash;
pub mod material_quantities;
pub mod model_statistics;
pub mod room_export;
pub mod room_tags;

pub use room_numbering::{assign_room_numbers, NumberAssignment, NumberRequest};
pub use color_splash::{plan_color_splash, ColorSplashPlan, SplashGroup};
pub use material_quantities::{material_quantities, MaterialQuantity, MaterialReport};
pub use model_statistics::{model_statistics, LevelInfo, LevelSummary, ModelStatistics};
pub use room_export::{export_rooms, RoomExport, RoomRecord};
pub use room_tags::{plan_room_tags, TagPlan};
