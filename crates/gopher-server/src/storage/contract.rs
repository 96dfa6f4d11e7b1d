//! Repository contract tests, run against every backend

use gopher_core::{Gopher, GopherError, GopherRepository, RequestContext};

fn ctx() -> RequestContext {
    RequestContext::background("contract")
}

fn jenny() -> Gopher {
    Gopher::new("G1", "Jenny", "http://img/jenny.png", 18)
}

async fn create_then_fetch(repo: &dyn GopherRepository) {
    repo.create_gopher(&ctx(), &jenny()).await.unwrap();

    let fetched = repo.fetch_gopher_by_id(&ctx(), "G1").await.unwrap();
    assert!(fetched.same_data(&jenny()), "got {fetched:?}");

    let all = repo.fetch_gophers(&ctx()).await.unwrap();
    assert_eq!(all.len(), 1);
    assert!(all[0].same_data(&jenny()));
}

async fn duplicate_create_keeps_original(repo: &dyn GopherRepository) {
    repo.create_gopher(&ctx(), &jenny()).await.unwrap();

    let impostor = Gopher::new("G1", "Impostor", "", 1);
    let err = repo.create_gopher(&ctx(), &impostor).await.unwrap_err();
    assert_eq!(err, GopherError::AlreadyExists("G1".to_string()));

    let fetched = repo.fetch_gopher_by_id(&ctx(), "G1").await.unwrap();
    assert!(fetched.same_data(&jenny()));
}

async fn fetch_missing_is_not_found(repo: &dyn GopherRepository) {
    let err = repo.fetch_gopher_by_id(&ctx(), "X").await.unwrap_err();
    assert_eq!(err, GopherError::NotFound("X".to_string()));
}

async fn fetch_all_on_empty_store(repo: &dyn GopherRepository) {
    assert!(repo.fetch_gophers(&ctx()).await.unwrap().is_empty());
}

async fn update_then_fetch(repo: &dyn GopherRepository) {
    repo.create_gopher(&ctx(), &Gopher::new("G1", "", "", 18))
        .await
        .unwrap();

    repo.update_gopher(&ctx(), "G1", &Gopher::new("G1", "", "", 99))
        .await
        .unwrap();

    let fetched = repo.fetch_gopher_by_id(&ctx(), "G1").await.unwrap();
    assert_eq!(fetched.id, "G1");
    assert_eq!(fetched.age, 99);
}

async fn update_missing_is_not_found(repo: &dyn GopherRepository) {
    let err = repo
        .update_gopher(&ctx(), "ghost", &Gopher::new("ghost", "Casper", "", 3))
        .await
        .unwrap_err();
    assert_eq!(err, GopherError::NotFound("ghost".to_string()));

    // Not an upsert.
    assert!(repo.fetch_gophers(&ctx()).await.unwrap().is_empty());
}

async fn delete_is_idempotent(repo: &dyn GopherRepository) {
    repo.create_gopher(&ctx(), &jenny()).await.unwrap();

    repo.delete_gopher(&ctx(), "G1").await.unwrap();
    repo.delete_gopher(&ctx(), "G1").await.unwrap();

    assert!(repo.fetch_gopher_by_id(&ctx(), "G1").await.unwrap_err().is_not_found());
    assert!(repo.fetch_gophers(&ctx()).await.unwrap().is_empty());
}

async fn fetch_all_returns_every_record(repo: &dyn GopherRepository) {
    for n in 0..5 {
        repo.create_gopher(&ctx(), &Gopher::new(format!("G{n}"), "", "", n))
            .await
            .unwrap();
    }

    let mut ids: Vec<String> = repo
        .fetch_gophers(&ctx())
        .await
        .unwrap()
        .into_iter()
        .map(|gopher| gopher.id)
        .collect();
    ids.sort();

    assert_eq!(ids, vec!["G0", "G1", "G2", "G3", "G4"]);
}

macro_rules! repository_contract {
    (@case $make:expr, [$($attr:tt)*], $case:ident) => {
        $($attr)*
        #[tokio::test]
        async fn $case() {
            let repo = $make;
            super::$case(&repo).await;
        }
    };
    (@cases $make:expr, $attrs:tt, $($case:ident),+) => {
        $(repository_contract!(@case $make, $attrs, $case);)+
    };
    ($backend:ident, $(#[$meta:meta])* => $make:expr) => {
        mod $backend {
            repository_contract!(@cases $make, [$(#[$meta])*],
                create_then_fetch,
                duplicate_create_keeps_original,
                fetch_missing_is_not_found,
                fetch_all_on_empty_store,
                update_then_fetch,
                update_missing_is_not_found,
                delete_is_idempotent,
                fetch_all_returns_every_record
            );
        }
    };
}

repository_contract!(memory, => crate::storage::MemoryRepository::new());

repository_contract!(sqlite, =>
    crate::storage::SqliteRepository::new(crate::storage::db::IN_MEMORY)
        .await
        .unwrap()
);

// Each test gets its own keyspace so runs never see each other's keys.
repository_contract!(redis, #[ignore = "requires a Redis server at REDIS_URL"] =>
    crate::storage::RedisRepository::connect(
        &std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".to_string()),
        format!("gophers-test-{}", uuid::Uuid::new_v4()),
    )
    .await
    .unwrap()
);
