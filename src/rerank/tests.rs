use super::client::{build_rerank_prompt, parse_ranking, validate_ranking};
use super::mock::MockReranker;
use super::model::{CandidateBrief, RankedEntry};
use super::{RerankError, Reranker};

fn briefs(ids: &[&str]) -> Vec<CandidateBrief> {
    ids.iter()
        .map(|id| CandidateBrief {
            id: id.to_string(),
            name: format!("Scholarship {id}"),
            snippet: None,
        })
        .collect()
}

fn entries(specs: &[(&str, f32)]) -> Vec<RankedEntry> {
    specs
        .iter()
        .map(|(id, score)| RankedEntry {
            id: id.to_string(),
            score: *score,
            rationale: "fits the profile".to_string(),
        })
        .collect()
}

#[test]
fn test_prompt_contains_summary_and_candidates() {
    let prompt = build_rerank_prompt("Canadian CS undergrad", &briefs(&["a", "b"]));

    assert!(prompt.contains("Canadian CS undergrad"));
    assert!(prompt.contains("Scholarship a"));
    assert!(prompt.contains("Scholarship b"));
    assert!(prompt.contains("JSON array"));
}

#[test]
fn test_parse_plain_json() {
    let parsed = parse_ranking(
        r#"[{"id": "a", "score": 90, "rationale": "strong fit"},
            {"id": "b", "score": 40, "rationale": "weaker fit"}]"#,
    )
    .expect("should parse");

    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].id, "a");
    assert_eq!(parsed[0].score, 90.0);
}

#[test]
fn test_parse_fenced_json() {
    let text = "```json\n[{\"id\": \"a\", \"score\": 55, \"rationale\": \"ok\"}]\n```";

    let parsed = parse_ranking(text).expect("should parse fenced block");
    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].score, 55.0);
}

#[test]
fn test_parse_prose_is_malformed() {
    let err = parse_ranking("The best candidate is clearly the first one.").unwrap_err();
    assert!(matches!(err, RerankError::Malformed { .. }));
}

#[test]
fn test_validate_accepts_complete_ranking() {
    let candidates = briefs(&["a", "b", "c"]);
    let ranking = entries(&[("c", 95.0), ("a", 60.0), ("b", 10.0)]);

    assert!(validate_ranking(&candidates, &ranking).is_ok());
}

#[test]
fn test_validate_rejects_missing_id() {
    let candidates = briefs(&["a", "b", "c"]);
    let ranking = entries(&[("a", 95.0), ("b", 60.0)]);

    let err = validate_ranking(&candidates, &ranking).unwrap_err();
    assert!(matches!(err, RerankError::Contract { .. }));
}

#[test]
fn test_validate_rejects_duplicate_id() {
    let candidates = briefs(&["a", "b"]);
    let ranking = entries(&[("a", 95.0), ("a", 60.0)]);

    let err = validate_ranking(&candidates, &ranking).unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_validate_rejects_unknown_id() {
    let candidates = briefs(&["a", "b"]);
    let ranking = entries(&[("a", 95.0), ("z", 60.0)]);

    let err = validate_ranking(&candidates, &ranking).unwrap_err();
    assert!(err.to_string().contains("unknown"));
}

#[test]
fn test_validate_rejects_out_of_range_score() {
    let candidates = briefs(&["a", "b"]);

    for bad in [-1.0, 100.5, f32::NAN] {
        let ranking = entries(&[("a", bad), ("b", 60.0)]);
        let err = validate_ranking(&candidates, &ranking).unwrap_err();
        assert!(matches!(err, RerankError::Contract { .. }));
    }
}

#[test]
fn test_validate_accepts_boundary_scores() {
    let candidates = briefs(&["a", "b"]);
    let ranking = entries(&[("a", 100.0), ("b", 0.0)]);

    assert!(validate_ranking(&candidates, &ranking).is_ok());
}

#[tokio::test]
async fn test_mock_reranker_default_order() {
    let reranker = MockReranker::new();
    let candidates = briefs(&["a", "b", "c"]);

    let ranking = reranker.rerank("summary", &candidates).await.unwrap();

    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0].id, "a");
    assert!(ranking[0].score > ranking[1].score);
    assert_eq!(reranker.call_count(), 1);
}

#[tokio::test]
async fn test_mock_reranker_reversing() {
    let reranker = MockReranker::reversing();
    let candidates = briefs(&["a", "b", "c"]);

    let ranking = reranker.rerank("summary", &candidates).await.unwrap();

    assert_eq!(ranking[0].id, "c");
    assert_eq!(ranking[2].id, "a");
    assert!(validate_ranking(&candidates, &ranking).is_ok());
}

#[tokio::test]
async fn test_mock_reranker_failing() {
    let reranker = MockReranker::failing("rate limited");

    let err = reranker.rerank("summary", &briefs(&["a"])).await.unwrap_err();
    assert!(matches!(err, RerankError::Provider { .. }));
}
