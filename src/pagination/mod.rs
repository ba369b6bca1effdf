//! Pagination: page-count estimation, overlay building and the override
//! container invariant

pub mod click;
mod command;
mod decoration;
mod estimator;
mod geometry;
mod guard;
mod options;
mod overrides;
mod probe;
mod scheduler;
mod state;

pub use click::{ClickEvent, ClickHandlers, RegionClickHandler};
pub use command::{set_override_content, OverrideContentParams};
pub use decoration::{DecorationBuilder, PAGE_NUMBER_TOKEN};
pub use estimator::{estimate, LayoutReading, MAX_PAGE_COUNT, TOLERANCE_PX};
pub use geometry::{ContentMargins, Margins, PageGeometry, PageSize, REGION_MAX_SHARE};
pub use guard::{ContainerState, TransactionGuard};
pub use options::{HeaderFooterContent, PaginationOptions};
pub use overrides::{OverrideSet, ResolvedContent};
pub use probe::{HeightProbe, HeightRecord};
pub use scheduler::FrameScheduler;
pub use state::{PaginationState, ViewUpdate};
