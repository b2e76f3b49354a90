mod catalog;
mod gateway;
mod view;

pub use catalog::EntityCatalog;
pub use gateway::{AssignmentGateway, AssignmentRequest};
pub use view::{GraphViewEvent, GraphViewSink, InteractionPhase, RenderMode};
