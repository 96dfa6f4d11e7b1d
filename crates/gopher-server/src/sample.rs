//! Sample gophers loaded with `--with-data`

use gopher_core::{Gopher, GopherError, GopherRepository, RequestContext};
use tracing::{debug, info};

pub fn gophers() -> Vec<Gopher> {
    vec![
        Gopher::new(
            "01D3XZ3ZHCP3KG9VT4FGAD8KDR",
            "Jenny",
            "https://storage.googleapis.com/gopherizeme.appspot.com/gophers/0ceb2c10fc0c30575c18ff1defa1ffd41501bc62.png",
            18,
        ),
        Gopher::new(
            "01D3XZ7CN92AKS9HAPSZ4D5DP9",
            "Billy",
            "https://storage.googleapis.com/gopherizeme.appspot.com/gophers/13c7d425111a501600db8587b52bb292836c5bee.png",
            24,
        ),
        Gopher::new(
            "01D3XZ89NFJZ9QT2DHVD462AC2",
            "Rainbow",
            "https://storage.googleapis.com/gopherizeme.appspot.com/gophers/b9e8d637c91c089fd56d7b159825fc9089377118.png",
            48,
        ),
        Gopher::new(
            "01D3XZ8JXHTDA6XY05EVJVE9Z2",
            "Bjorn",
            "https://storage.googleapis.com/gopherizeme.appspot.com/gophers/fd01b36091560c2a128b8fddfb2c627d8bb7417c.png",
            32,
        ),
    ]
}

/// Store the sample gophers, skipping the ones already present.
pub async fn seed(repo: &dyn GopherRepository, ctx: &RequestContext) -> gopher_core::Result<usize> {
    let mut created = 0;
    for gopher in gophers() {
        match repo.create_gopher(ctx, &gopher).await {
            Ok(()) => created += 1,
            Err(GopherError::AlreadyExists(id)) => debug!("Sample gopher {} already stored", id),
            Err(e) => return Err(e),
        }
    }

    info!("Seeded {} sample gophers", created);
    Ok(created)
}
