// ==========================================
// Depot repository conformance tests
// ==========================================
// Every test runs against all three drivers on fresh databases
// ==========================================


use chrono::Utc;
use depot_management::app::RepositoryMode;
use depot_management::domain::{Depot, FilterOptions};
use depot_management::logging;
use depot_management::repository::{
    DepotRepository, DepotRepositoryExt, MutationOutcome, RepositoryError, RepositoryOptions,
};
use std::collections::HashSet;
use std::time::Duration;
use test_helpers::{create_test_db, repositories_per_driver};

async fn add_named(repo: &dyn DepotRepository, name: &str) -> Depot {
    repo.add(Depot::new(name).with_created_by("tester"))
        .await
        .expect("add depot")
}

fn names(depots: &[Depot]) -> Vec<String> {
    depots
        .iter()
        .map(|d| d.name.clone().unwrap_or_default())
        .collect()
}

// ==========================================
// add / get
// ==========================================

#[tokio::test]
async fn test_main_warehouse_round_trip() {
    logging::init_test();

    for (_db, repo) in repositories_per_driver() {
        let driver = repo.driver_name();
        let before = Utc::now();

        let added = repo
            .add(Depot::new("Main Warehouse").with_created_by("admin"))
            .await
            .unwrap();
        assert_eq!(added.id, 1, "driver={}", driver);
        assert!(!added.is_deleted);
        assert_eq!(added.active, Some(true));

        let loaded = repo.get_by_id(added.id).await.unwrap().expect("stored depot");
        assert_eq!(loaded.name.as_deref(), Some("Main Warehouse"), "driver={}", driver);
        assert_eq!(loaded.created_by.as_deref(), Some("admin"));
        assert!(loaded.is_active());
        assert!(!loaded.is_deleted);
        assert!(loaded.created_at.timestamp() >= before.timestamp() - 1);
        assert_eq!(loaded.created_at, added.created_at, "driver={}", driver);
    }
}

#[tokio::test]
async fn test_inserted_ids_are_positive_and_unique() {
    logging::init_test();

    for (_db, repo) in repositories_per_driver() {
        let mut ids = HashSet::new();
        for i in 0..5 {
            let depot = add_named(repo.as_ref(), &format!("Depot {}", i)).await;
            assert!(depot.id > 0);
            assert!(ids.insert(depot.id), "driver={} duplicate id", repo.driver_name());
        }
    }
}

#[tokio::test]
async fn test_add_ignores_caller_flags() {
    logging::init_test();

    for (_db, repo) in repositories_per_driver() {
        let mut draft = Depot::new("Flagged");
        draft.is_deleted = true;
        draft.active = None;

        let added = repo.add(draft).await.unwrap();
        let loaded = repo.get_by_id(added.id).await.unwrap();
        let loaded = loaded.expect("add must store a live row");
        assert!(!loaded.is_deleted, "driver={}", repo.driver_name());
        assert_eq!(loaded.active, Some(true));
    }
}

#[tokio::test]
async fn test_get_all_on_empty_store() {
    for (_db, repo) in repositories_per_driver() {
        assert!(repo.get_all().await.unwrap().is_empty());
        assert!(repo.get_by_id(42).await.unwrap().is_none());
    }
}

// ==========================================
// soft delete
// ==========================================

#[tokio::test]
async fn test_add_two_delete_first() {
    logging::init_test();

    for (_db, repo) in repositories_per_driver() {
        let first = add_named(repo.as_ref(), "First").await;
        let second = add_named(repo.as_ref(), "Second").await;

        assert_eq!(repo.delete(first.id).await.unwrap(), MutationOutcome::Updated);

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 1, "driver={}", repo.driver_name());
        assert_eq!(all[0].id, second.id);
        assert!(repo.get_by_id(first.id).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_delete_twice_reports_not_found() {
    for (_db, repo) in repositories_per_driver() {
        let depot = add_named(repo.as_ref(), "Short-lived").await;

        assert_eq!(repo.delete(depot.id).await.unwrap(), MutationOutcome::Updated);
        assert_eq!(repo.delete(depot.id).await.unwrap(), MutationOutcome::NotFound);
        assert_eq!(repo.delete(9_999).await.unwrap(), MutationOutcome::NotFound);

        let mut edit = depot.clone();
        edit.name = Some("Revived".to_string());
        assert_eq!(
            repo.update(&edit).await.unwrap(),
            MutationOutcome::NotFound,
            "driver={} updated a deleted row",
            repo.driver_name()
        );
    }
}

#[tokio::test]
async fn test_deleted_rows_are_kept_physically() {
    let (_db, path) = create_test_db().unwrap();
    let repo = test_helpers::repository(&path, RepositoryMode::Raw);

    let depot = add_named(repo.as_ref(), "Archived").await;
    repo.delete(depot.id).await.unwrap();

    assert_eq!(test_helpers::raw_row_count(&path), 1);
}

// ==========================================
// update
// ==========================================

#[tokio::test]
async fn test_update_overwrites_name_and_active_only() {
    logging::init_test();

    for (_db, repo) in repositories_per_driver() {
        let added = add_named(repo.as_ref(), "Old Name").await;

        let mut edit = added.clone();
        edit.name = Some("New Name".to_string());
        edit.active = Some(false);
        edit.created_by = Some("intruder".to_string());
        edit.created_at = added.created_at - chrono::Duration::days(30);

        assert_eq!(repo.update(&edit).await.unwrap(), MutationOutcome::Updated);

        let loaded = repo.get_by_id(added.id).await.unwrap().unwrap();
        assert_eq!(loaded.name.as_deref(), Some("New Name"), "driver={}", repo.driver_name());
        assert_eq!(loaded.active, Some(false));
        assert_eq!(loaded.created_by.as_deref(), Some("tester"));
        assert_eq!(loaded.created_at, added.created_at);
    }
}

#[tokio::test]
async fn test_update_with_absent_active_writes_true() {
    for (_db, repo) in repositories_per_driver() {
        let added = repo.add(Depot::new("Idle").with_active(false)).await.unwrap();
        assert_eq!(
            repo.get_by_id(added.id).await.unwrap().unwrap().active,
            Some(false)
        );

        let mut edit = added.clone();
        edit.active = None;
        repo.update(&edit).await.unwrap();

        let loaded = repo.get_by_id(added.id).await.unwrap().unwrap();
        assert_eq!(loaded.active, Some(true), "driver={}", repo.driver_name());
    }
}

#[tokio::test]
async fn test_update_missing_id() {
    for (_db, repo) in repositories_per_driver() {
        let mut ghost = Depot::new("Ghost");
        ghost.id = 77;
        assert_eq!(repo.update(&ghost).await.unwrap(), MutationOutcome::NotFound);
    }
}

// ==========================================
// list: ordering, paging, search
// ==========================================

#[tokio::test]
async fn test_default_order_is_newest_first() {
    for (_db, repo) in repositories_per_driver() {
        for name in ["B", "C", "A"] {
            add_named(repo.as_ref(), name).await;
        }

        assert_eq!(names(&repo.get_all().await.unwrap()), vec!["A", "C", "B"]);

        let page = repo.list(&FilterOptions::page(0, 10)).await.unwrap();
        assert_eq!(names(&page.items), vec!["A", "C", "B"], "driver={}", repo.driver_name());
        assert_eq!(page.total_count, 3);
    }
}

#[tokio::test]
async fn test_page_size_one_over_two_rows() {
    logging::init_test();

    for (_db, repo) in repositories_per_driver() {
        let first = add_named(repo.as_ref(), "Alpha").await;
        let second = add_named(repo.as_ref(), "Beta").await;

        let page0 = repo.list(&FilterOptions::page(0, 1)).await.unwrap();
        let page1 = repo.list(&FilterOptions::page(1, 1)).await.unwrap();
        let page2 = repo.list(&FilterOptions::page(2, 1)).await.unwrap();

        assert_eq!(page0.total_count, 2);
        assert_eq!(page1.total_count, 2);
        assert_eq!(page0.items.len(), 1);
        assert_eq!(page1.items.len(), 1);
        assert!(page2.items.is_empty());

        let seen: HashSet<i64> = page0.items.iter().chain(&page1.items).map(|d| d.id).collect();
        assert_eq!(
            seen,
            HashSet::from([first.id, second.id]),
            "driver={}",
            repo.driver_name()
        );
    }
}

#[tokio::test]
async fn test_paging_covers_total_exactly() {
    for (_db, repo) in repositories_per_driver() {
        for i in 0..7 {
            add_named(repo.as_ref(), &format!("Depot {:02}", i)).await;
        }

        let mut collected = Vec::new();
        let mut page_index = 0;
        loop {
            let page = repo.list(&FilterOptions::page(page_index, 3)).await.unwrap();
            assert_eq!(page.total_count, 7);
            assert!(page.items.len() <= 3);
            if page.items.is_empty() {
                break;
            }
            collected.extend(page.items.into_iter().map(|d| d.id));
            page_index += 1;
        }

        assert_eq!(page_index, 3, "driver={}", repo.driver_name());
        assert_eq!(collected.len(), 7);
        assert_eq!(collected.iter().collect::<HashSet<_>>().len(), 7);
    }
}

#[tokio::test]
async fn test_page_size_zero_returns_count_only() {
    for (_db, repo) in repositories_per_driver() {
        add_named(repo.as_ref(), "One").await;
        add_named(repo.as_ref(), "Two").await;

        let page = repo.list(&FilterOptions::page(0, 0)).await.unwrap();
        assert!(page.items.is_empty(), "driver={}", repo.driver_name());
        assert_eq!(page.total_count, 2);
    }
}

#[tokio::test]
async fn test_search_is_case_sensitive_substring() {
    logging::init_test();

    for (_db, repo) in repositories_per_driver() {
        add_named(repo.as_ref(), "Main Warehouse").await;
        add_named(repo.as_ref(), "main depot").await;
        add_named(repo.as_ref(), "Annex").await;
        repo.add(Depot::default()).await.unwrap(); // NULL name

        let upper = repo
            .list(&FilterOptions::page(0, 10).with_search("Name", "Main"))
            .await
            .unwrap();
        assert_eq!(names(&upper.items), vec!["Main Warehouse"], "driver={}", repo.driver_name());
        assert_eq!(upper.total_count, 1);

        let lower = repo
            .list(&FilterOptions::page(0, 10).with_search("Name", "main"))
            .await
            .unwrap();
        assert_eq!(names(&lower.items), vec!["main depot"]);

        let inner = repo
            .list(&FilterOptions::page(0, 10).with_search("", "ne"))
            .await
            .unwrap();
        assert_eq!(names(&inner.items), vec!["Annex"]);

        let empty = repo
            .list(&FilterOptions::page(0, 10).with_search("Name", ""))
            .await
            .unwrap();
        assert_eq!(empty.total_count, 4);
    }
}

#[tokio::test]
async fn test_search_query_is_not_trimmed() {
    for (_db, repo) in repositories_per_driver() {
        add_named(repo.as_ref(), "Main Warehouse").await;
        add_named(repo.as_ref(), "Mainland").await;
        add_named(repo.as_ref(), "Annex").await;

        let space = repo
            .list(&FilterOptions::page(0, 10).with_search("Name", " "))
            .await
            .unwrap();
        assert_eq!(names(&space.items), vec!["Main Warehouse"], "driver={}", repo.driver_name());
        assert_eq!(space.total_count, 1);

        let padded = repo
            .list(&FilterOptions::page(0, 10).with_search("Name", "Main "))
            .await
            .unwrap();
        assert_eq!(names(&padded.items), vec!["Main Warehouse"], "driver={}", repo.driver_name());
        assert_eq!(padded.total_count, 1);
    }
}

#[tokio::test]
async fn test_unknown_search_field_searches_name() {
    for (_db, repo) in repositories_per_driver() {
        add_named(repo.as_ref(), "Harbor").await;
        add_named(repo.as_ref(), "Airport").await;

        let page = repo
            .list(&FilterOptions::page(0, 10).with_search("CreatedBy", "Harb"))
            .await
            .unwrap();
        assert_eq!(names(&page.items), vec!["Harbor"], "driver={}", repo.driver_name());
    }
}

#[tokio::test]
async fn test_name_sort_orders() {
    for (_db, repo) in repositories_per_driver() {
        for name in ["Delta", "Bravo", "Charlie", "Bravo"] {
            add_named(repo.as_ref(), name).await;
        }

        let asc = repo
            .list(&FilterOptions::page(0, 10).with_sort("Name"))
            .await
            .unwrap();
        assert_eq!(
            names(&asc.items),
            vec!["Bravo", "Bravo", "Charlie", "Delta"],
            "driver={}",
            repo.driver_name()
        );
        // ties: newest first
        assert!(asc.items[0].id > asc.items[1].id);

        let desc = repo
            .list(&FilterOptions::page(0, 10).with_sort("NameDesc"))
            .await
            .unwrap();
        assert_eq!(names(&desc.items), vec!["Delta", "Charlie", "Bravo", "Bravo"]);
    }
}

#[tokio::test]
async fn test_list_excludes_deleted_rows() {
    for (_db, repo) in repositories_per_driver() {
        let keep = add_named(repo.as_ref(), "Keep").await;
        let gone = add_named(repo.as_ref(), "Keep too").await;
        repo.delete(gone.id).await.unwrap();

        let page = repo
            .list(&FilterOptions::page(0, 10).with_search("Name", "Keep"))
            .await
            .unwrap();
        assert_eq!(page.total_count, 1, "driver={}", repo.driver_name());
        assert_eq!(page.items[0].id, keep.id);
    }
}

#[tokio::test]
async fn test_parent_identifier_is_ignored() {
    for (_db, repo) in repositories_per_driver() {
        add_named(repo.as_ref(), "North").await;
        add_named(repo.as_ref(), "South").await;

        let by_options = repo
            .list_by(&FilterOptions::page(0, 10).with_parent("tenant-7".to_string()))
            .await
            .unwrap();
        assert_eq!(by_options.total_count, 2);

        let positional = repo
            .get_articles(0, 1, "Name", "South", "NameDesc", 123_i64)
            .await
            .unwrap();
        assert_eq!(positional.total_count, 1, "driver={}", repo.driver_name());
        assert_eq!(names(&positional.items), vec!["South"]);
    }
}

// ==========================================
// failures
// ==========================================

#[tokio::test]
async fn test_missing_table_is_a_query_error() {
    for mode in RepositoryMode::ALL {
        let (_db, path) = test_helpers::create_empty_db().unwrap();
        let repo = test_helpers::repository(&path, mode);

        let err = repo.get_all().await.unwrap_err();
        assert!(
            matches!(err, RepositoryError::DatabaseQueryError(_)),
            "driver={} err={:?}",
            mode,
            err
        );
    }
}

#[tokio::test]
async fn test_operation_timeout_while_database_is_locked() {
    logging::init_test();

    for mode in RepositoryMode::ALL {
        let (_db, path) = create_test_db().unwrap();
        let repo = depot_management::register_depot_repository(
            &path,
            mode,
            RepositoryOptions::with_timeout(Duration::from_millis(100)),
        );

        let locker = rusqlite::Connection::open(&path).unwrap();
        locker.execute_batch("BEGIN EXCLUSIVE").unwrap();

        let err = repo.get_all().await.unwrap_err();
        assert!(err.is_timeout(), "driver={} err={:?}", mode, err);

        locker.execute_batch("ROLLBACK").unwrap();
    }
}
