// ==========================================
// Driver registration + cross-driver consistency
// ==========================================


use depot_management::app::{AppState, RepositoryMode};
use depot_management::config::{DepotAppConfig, ENV_DB_PATH, ENV_OPERATION_TIMEOUT_MS, ENV_REPOSITORY_MODE};
use depot_management::domain::{Depot, FilterOptions};
use depot_management::logging;
use depot_management::repository::DepotRepository;
use std::collections::HashMap;
use std::time::Duration;

fn config_for(db_path: &str, mode: &str) -> DepotAppConfig {
    let vars: HashMap<&str, String> = HashMap::from([
        (ENV_DB_PATH, db_path.to_string()),
        (ENV_REPOSITORY_MODE, mode.to_string()),
        (ENV_OPERATION_TIMEOUT_MS, "2500".to_string()),
    ]);
    DepotAppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

#[test]
fn test_state_uses_configured_driver() {
    logging::init_test();
    let (_db, path) = test_helpers::create_test_db().unwrap();

    for (raw, expected) in [
        ("mapped", "mapped"),
        ("Templated", "templated"),
        ("RAW", "raw"),
    ] {
        let config = config_for(&path, raw);
        assert_eq!(config.operation_timeout, Duration::from_millis(2500));

        let state = AppState::from_config(&config);
        assert_eq!(state.depots.driver_name(), expected);
        assert_eq!(state.repository_mode.as_str(), expected);
        assert_eq!(state.db_path, path);
    }
}

#[test]
fn test_unknown_mode_is_a_config_error() {
    let vars = HashMap::from([
        (ENV_DB_PATH, "depots.db".to_string()),
        (ENV_REPOSITORY_MODE, "orm".to_string()),
    ]);
    let err = DepotAppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap_err();
    assert!(err.to_string().contains(ENV_REPOSITORY_MODE));
}

#[tokio::test]
async fn test_drivers_agree_on_shared_database() {
    logging::init_test();
    let (_db, path) = test_helpers::create_test_db().unwrap();

    let mapped = test_helpers::repository(&path, RepositoryMode::Mapped);
    let templated = test_helpers::repository(&path, RepositoryMode::Templated);
    let raw = test_helpers::repository(&path, RepositoryMode::Raw);

    let a = mapped.add(Depot::new("From mapped").with_created_by("m")).await.unwrap();
    let b = templated.add(Depot::new("From templated")).await.unwrap();
    let c = raw.add(Depot::new("From raw").with_active(false)).await.unwrap();
    raw.delete(b.id).await.unwrap();

    let expected = vec![c.id, a.id];
    for repo in [&mapped, &templated, &raw] {
        let all = repo.get_all().await.unwrap();
        assert_eq!(
            all.iter().map(|d| d.id).collect::<Vec<_>>(),
            expected,
            "driver={}",
            repo.driver_name()
        );

        let loaded = repo.get_by_id(a.id).await.unwrap().unwrap();
        assert_eq!(loaded.created_by.as_deref(), Some("m"));
        assert_eq!(loaded.created_at, a.created_at);

        let inactive = repo.get_by_id(c.id).await.unwrap().unwrap();
        assert_eq!(inactive.active, Some(false));

        let page = repo
            .list(&FilterOptions::page(0, 10).with_search("Name", "From"))
            .await
            .unwrap();
        assert_eq!(page.total_count, 2);
    }
}
