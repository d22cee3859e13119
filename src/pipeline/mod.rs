pub mod stage1_quality;
pub mod stage2_concerns;
pub mod stage3_arguments;
pub mod stage4_aggregate;
pub mod stage5_text_signals;
pub mod stage6_snapshot;
pub mod stage7_report;
