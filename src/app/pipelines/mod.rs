pub mod slot_pipeline;
