pub mod error_stage {
    pub const PROCESSING: &str = "processing";
}

pub mod error_type {
    pub const ENCODER_FAILED: &str = "encoder_failed";
    pub const PARSER_FAILED: &str = "parser_failed";
}
