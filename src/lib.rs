// Element Kernel - Core Library
// Exposes the kernel and its command families for the CLI and tests

pub mod error;
pub mod attributes;  // Entity ids, attribute access, material layers
pub mod identifier;  // KeyExtractor + UniqueIdentifierAllocator
pub mod grouping;    // GroupingAccumulator
pub mod color;       // ColorMapper
pub mod units;
pub mod commands;    // Room numbering, color splash, quantities, stats, export, tags
pub mod config;
pub mod loader;
pub mod report;

// Re-export commonly used types
pub use error::{KernelError, KernelResult};
pub use attributes::{
    AttributeSource, AttributeValue, Element, EntityId, MaterialLayer,
};
pub use identifier::{
    allocate, next_available,
    AllocationPolicy, IdentifierAllocator, IdentifierCandidate, TakenSet,
};
pub use grouping::{
    group, GroupBucket, Grouping, GroupingAccumulator, MetricFn, MetricSet,
};
pub use color::{
    assign_discrete, assign_gradient, ColorAssignment, ColorScheme, Rgb,
};
pub use units::{feet_to_mm, mm_to_feet, MM_PER_FOOT};
pub use commands::{
    assign_room_numbers, NumberAssignment, NumberRequest,
    plan_color_splash, ColorSplashPlan, SplashGroup,
    material_quantities, MaterialQuantity, MaterialReport,
    model_statistics, LevelInfo, LevelSummary, ModelStatistics,
    export_rooms, RoomExport, RoomRecord,
    plan_room_tags, TagPlan,
};
pub use config::KernelConfig;
pub use loader::{load_elements, load_elements_from_reader};
pub use report::Report;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
