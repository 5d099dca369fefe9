//! Pipeline core: tasks, codecs, business roles and the engine that ties them

pub mod codec;
pub mod observer;
pub mod pipeline;
pub mod provider;
pub mod registry;
pub mod task;
