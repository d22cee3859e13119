use super::{filter_directive, init_logging};

#[test]
fn test_filter_directive_precedence() {
    assert_eq!(filter_directive(0, None), "info");
    assert_eq!(filter_directive(0, Some("  ")), "info");
    assert_eq!(
        filter_directive(0, Some("campus_surveyqc=debug")),
        "campus_surveyqc=debug"
    );
    assert_eq!(filter_directive(1, Some("warn")), "debug");
    assert_eq!(filter_directive(2, None), "trace");
    assert_eq!(filter_directive(5, None), "trace");
}

#[test]
fn test_init_logging_twice_is_harmless() {
    init_logging(0);
    init_logging(2);
    tracing::info!("logging initialised");
}
