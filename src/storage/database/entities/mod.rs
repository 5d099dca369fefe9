/// Pipeline task entity module
pub mod pipeline_task;

pub use pipeline_task::Entity as PipelineTask;
