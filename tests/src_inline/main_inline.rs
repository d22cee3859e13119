use clap::Parser;

use super::*;

#[test]
fn test_parse_run_defaults() {
    let cli = Cli::try_parse_from(["campus-surveyqc", "run", "--input", "responses.csv"]).unwrap();
    assert_eq!(cli.verbose, 0);
    match cli.command {
        Command::Run { source, out } => {
            assert_eq!(source.input, PathBuf::from("responses.csv"));
            assert!(source.cache.is_none());
            assert!(!source.refresh);
            assert_eq!(out, PathBuf::from("surveyqc_out"));
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_compare_selectors() {
    let cli = Cli::try_parse_from([
        "campus-surveyqc",
        "-vv",
        "compare",
        "--input",
        "r.csv",
        "course:PhD",
        "year:1st Year",
    ])
    .unwrap();
    assert_eq!(cli.verbose, 2);
    match cli.command {
        Command::Compare {
            group_a, group_b, ..
        } => {
            assert_eq!(group_a.field, GroupField::Course);
            assert_eq!(group_b.value, "1st Year");
        }
        other => panic!("unexpected command {other:?}"),
    }
    assert!(Cli::try_parse_from(["campus-surveyqc", "compare", "--input", "r.csv", "PhD", "course:UG"]).is_err());
}

#[test]
fn test_parse_response_filters() {
    let cli = Cli::try_parse_from([
        "campus-surveyqc",
        "responses",
        "--input",
        "r.csv",
        "--q1",
        "no",
        "--concern",
        "Privacy",
        "--concern",
        "safety",
        "--page-size",
        "20",
    ])
    .unwrap();
    match cli.command {
        Command::Responses {
            q1,
            concern,
            page,
            page_size,
            ..
        } => {
            assert!(matches!(q1, Some(VoteArg::No)));
            assert_eq!(concern, vec![ConcernCategory::Privacy, ConcernCategory::Safety]);
            assert_eq!(page, 1);
            assert_eq!(page_size, 20);
        }
        other => panic!("unexpected command {other:?}"),
    }
    assert!(parse_concern("weather").is_err());
}

#[test]
fn test_parse_recommendations_with_cache() {
    let cli = Cli::try_parse_from([
        "campus-surveyqc",
        "recommendations",
        "--input",
        "r.csv",
        "--cache",
        "snap.gz",
        "--refresh",
    ])
    .unwrap();
    match cli.command {
        Command::Recommendations { source } => {
            assert_eq!(source.cache, Some(PathBuf::from("snap.gz")));
            assert!(source.refresh);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_default_profile_without_path() {
    assert_eq!(load_profile(None).unwrap(), AnalysisProfile::default_v1());
}
