pub mod generated_item;
pub mod pipeline;
