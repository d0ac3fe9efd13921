use std::{collections::BTreeMap, sync::Arc, time::Duration};

use trellis_domain::RECORD_TTL;
use trellis_service::{Error, GetParamsQuery, TrellisService, UpdateRequest};
use trellis_storage::{ParamBackend, memory::MemoryBackend};

fn service() -> (Arc<MemoryBackend>, TrellisService) {
	let backend = Arc::new(MemoryBackend::new());

	(backend.clone(), TrellisService::new(backend))
}

fn request(repo: &str, branch: &str, pairs: &[(&str, &str)]) -> UpdateRequest {
	UpdateRequest {
		repo: repo.to_string(),
		branch: branch.to_string(),
		service_data: pairs
			.iter()
			.map(|(field, value)| (field.to_string(), value.to_string()))
			.collect(),
	}
}

fn query(repo: &str, branch: Option<&str>) -> GetParamsQuery {
	GetParamsQuery { repo: repo.to_string(), branch: branch.map(str::to_string) }
}

#[tokio::test]
async fn update_then_exact_query_round_trips() {
	let (_, service) = service();
	let outcome = service
		.update(request("shop", "main", &[("image", "shop:42"), ("cluster", "dev")]))
		.await
		.expect("Failed to store parameter set.");

	assert_eq!(outcome.key, "shop:main");
	assert_eq!(outcome.id, 1);

	let records = service
		.get_params(query("shop", Some("main")))
		.await
		.expect("Failed to query parameter set.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].repo, "shop");
	assert_eq!(records[0].branch, "main");
	assert_eq!(records[0].service_data.get("image").map(String::as_str), Some("shop:42"));
	assert_eq!(records[0].service_data.get("cluster").map(String::as_str), Some("dev"));
	assert_eq!(records[0].service_data.get("id").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn sequence_numbers_increase_across_writes() {
	let (_, service) = service();

	for (expected, branch) in [(1, "a"), (2, "b"), (3, "c")] {
		let outcome = service
			.update(request("shop", branch, &[("image", "x")]))
			.await
			.expect("Failed to store parameter set.");

		assert_eq!(outcome.id, expected);
	}
}

#[tokio::test]
async fn rewrite_replaces_the_whole_set_and_reorders() {
	let (_, service) = service();

	service
		.update(request("shop", "a", &[("image", "shop:1"), ("stale", "yes")]))
		.await
		.expect("Failed to store parameter set.");
	service
		.update(request("shop", "b", &[("image", "shop:2")]))
		.await
		.expect("Failed to store parameter set.");
	service
		.update(request("shop", "a", &[("image", "shop:3")]))
		.await
		.expect("Failed to store parameter set.");

	let records =
		service.get_params(query("shop", None)).await.expect("Failed to query parameter sets.");

	// The rewrite gave branch a a fresh sequence number, moving it last.
	assert_eq!(records.len(), 2);
	assert_eq!(records[0].branch, "b");
	assert_eq!(records[1].branch, "a");
	assert_eq!(records[1].service_data.get("id").map(String::as_str), Some("3"));
	assert!(!records[1].service_data.contains_key("stale"));
}

#[tokio::test]
async fn caller_supplied_id_is_overwritten() {
	let (_, service) = service();
	let outcome = service
		.update(request("shop", "main", &[("id", "999"), ("image", "x")]))
		.await
		.expect("Failed to store parameter set.");

	assert_eq!(outcome.id, 1);

	let records = service
		.get_params(query("shop", Some("main")))
		.await
		.expect("Failed to query parameter set.");

	assert_eq!(records[0].service_data.get("id").map(String::as_str), Some("1"));
}

#[tokio::test]
async fn updates_with_missing_parts_are_rejected() {
	let (_, service) = service();

	for request in [
		request("", "main", &[("image", "x")]),
		request("shop", "   ", &[("image", "x")]),
		request("shop", "main", &[]),
	] {
		let err = service.update(request).await.expect_err("Expected a validation error.");

		assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");
	}
}

#[tokio::test]
async fn repo_names_with_colons_are_rejected() {
	let (_, service) = service();
	let err = service
		.update(request("shop:eu", "main", &[("image", "x")]))
		.await
		.expect_err("Expected a validation error.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");

	let err = service
		.get_params(query("shop:eu", None))
		.await
		.expect_err("Expected a validation error.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn queries_require_a_repo() {
	let (_, service) = service();
	let err =
		service.get_params(query("  ", None)).await.expect_err("Expected a validation error.");

	assert!(matches!(err, Error::InvalidRequest { .. }), "Unexpected error: {err}");
}

#[tokio::test]
async fn unknown_pairs_yield_no_records() {
	let (_, service) = service();
	let records = service
		.get_params(query("shop", Some("missing")))
		.await
		.expect("Failed to query parameter set.");

	assert!(records.is_empty());

	let records =
		service.get_params(query("shop", None)).await.expect("Failed to query parameter sets.");

	assert!(records.is_empty());
}

#[tokio::test]
async fn fan_out_covers_all_branches_in_write_order() {
	let (_, service) = service();

	for branch in ["one", "two", "three"] {
		service
			.update(request("shop", branch, &[("image", "x")]))
			.await
			.expect("Failed to store parameter set.");
	}
	// A different repository must not leak into the fan-out.
	service
		.update(request("shopify", "main", &[("image", "y")]))
		.await
		.expect("Failed to store parameter set.");

	let records =
		service.get_params(query("shop", None)).await.expect("Failed to query parameter sets.");
	let branches = records.iter().map(|record| record.branch.as_str()).collect::<Vec<_>>();

	assert_eq!(branches, vec!["one", "two", "three"]);

	// A blank branch means fan-out, same as an absent one.
	let records = service
		.get_params(query("shop", Some("   ")))
		.await
		.expect("Failed to query parameter sets.");

	assert_eq!(records.len(), 3);
}

#[tokio::test]
async fn branch_names_with_colons_round_trip() {
	let (_, service) = service();

	service
		.update(request("shop", "feature/x:y", &[("image", "x")]))
		.await
		.expect("Failed to store parameter set.");

	let records = service
		.get_params(query("shop", Some("feature/x:y")))
		.await
		.expect("Failed to query parameter set.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].repo, "shop");
	assert_eq!(records[0].branch, "feature/x:y");
}

#[tokio::test]
async fn surrounding_whitespace_is_trimmed() {
	let (_, service) = service();
	let outcome = service
		.update(request("  shop  ", " main ", &[("image", "x")]))
		.await
		.expect("Failed to store parameter set.");

	assert_eq!(outcome.key, "shop:main");

	let records = service
		.get_params(query(" shop", Some("main ")))
		.await
		.expect("Failed to query parameter set.");

	assert_eq!(records.len(), 1);
}

#[tokio::test]
async fn expired_records_vanish_from_queries() {
	let (backend, service) = service();

	service
		.update(request("shop", "main", &[("image", "x")]))
		.await
		.expect("Failed to store parameter set.");
	backend.advance(RECORD_TTL + Duration::from_secs(1));

	let records = service
		.get_params(query("shop", Some("main")))
		.await
		.expect("Failed to query parameter set.");

	assert!(records.is_empty());

	let records =
		service.get_params(query("shop", None)).await.expect("Failed to query parameter sets.");

	assert!(records.is_empty());
}

#[tokio::test]
async fn rewrites_rearm_the_expiry() {
	let (backend, service) = service();
	let most_of_the_ttl = RECORD_TTL - Duration::from_secs(60);

	service
		.update(request("shop", "main", &[("image", "shop:1")]))
		.await
		.expect("Failed to store parameter set.");
	backend.advance(most_of_the_ttl);
	service
		.update(request("shop", "main", &[("image", "shop:2")]))
		.await
		.expect("Failed to store parameter set.");
	backend.advance(most_of_the_ttl);

	let records = service
		.get_params(query("shop", Some("main")))
		.await
		.expect("Failed to query parameter set.");

	assert_eq!(records.len(), 1);
	assert_eq!(records[0].service_data.get("image").map(String::as_str), Some("shop:2"));
}

#[tokio::test]
async fn legacy_records_without_an_id_sort_first() {
	let (backend, service) = service();
	let legacy = BTreeMap::from([("image".to_string(), "legacy".to_string())]);

	backend.put("shop:legacy", &legacy, RECORD_TTL).await.expect("Failed to seed record.");
	service
		.update(request("shop", "main", &[("image", "x")]))
		.await
		.expect("Failed to store parameter set.");

	let records =
		service.get_params(query("shop", None)).await.expect("Failed to query parameter sets.");

	assert_eq!(records.len(), 2);
	assert_eq!(records[0].branch, "legacy");
	assert_eq!(records[1].branch, "main");
}

#[tokio::test]
async fn corrupt_keys_surface_as_errors() {
	let (backend, service) = service();
	let fields = BTreeMap::from([("image".to_string(), "x".to_string())]);

	backend.put("shop:", &fields, RECORD_TTL).await.expect("Failed to seed record.");

	let err =
		service.get_params(query("shop", None)).await.expect_err("Expected a corrupt key error.");

	assert!(matches!(err, Error::CorruptKey { key } if key == "shop:"), "Unexpected error.");
}

#[tokio::test]
async fn fan_out_over_the_counter_repo_hits_the_counter_key() {
	let (_, service) = service();

	// "data" is effectively reserved: its fan-out pattern matches the
	// sequence counter, which does not hold a field map.
	service
		.update(request("data", "main", &[("image", "x")]))
		.await
		.expect("Failed to store parameter set.");

	let err = service.get_params(query("data", None)).await.expect_err("Expected a backend error.");

	assert!(matches!(err, Error::Backend(_)), "Unexpected error: {err}");
}

#[tokio::test]
async fn duplicate_candidates_assemble_into_duplicate_records() {
	let (_, service) = service();

	service
		.update(request("shop", "main", &[("image", "x")]))
		.await
		.expect("Failed to store parameter set.");

	let keys = vec!["shop:main".to_string(), "shop:main".to_string()];
	let records = service.assemble(&keys).await.expect("Failed to assemble records.");

	assert_eq!(records.len(), 2);
	assert_eq!(records[0], records[1]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_writes_get_distinct_sequence_numbers() {
	let (_, service) = service();
	let service = Arc::new(service);
	let mut handles = Vec::new();

	for i in 0..16 {
		let service = service.clone();

		handles.push(tokio::spawn(async move {
			service
				.update(request("shop", &format!("branch-{i}"), &[("image", "x")]))
				.await
				.expect("Failed to store parameter set.")
				.id
		}));
	}

	let mut ids = Vec::new();

	for handle in handles {
		ids.push(handle.await.expect("Write task panicked."));
	}

	ids.sort_unstable();

	assert_eq!(ids, (1..=16).collect::<Vec<i64>>());
}
