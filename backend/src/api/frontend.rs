use rocket::fs::NamedFile;
use rocket::{get, State};
use std::path::{Path, PathBuf};

/// Directory holding the built single-page app.
pub struct SpaRoot(pub PathBuf);

/// Client-side routes (`/logs`, `/statistics`, ...) get `index.html`.
/// Real files are served by the `FileServer` mounted next to this route.
#[get("/<path..>", rank = 20)]
pub async fn spa_fallback(path: PathBuf, root: &State<SpaRoot>) -> Option<NamedFile> {
    if !should_fallback_to_index(&path) {
        return None;
    }
    NamedFile::open(root.0.join("index.html")).await.ok()
}

fn should_fallback_to_index(path: &Path) -> bool {
    if path.starts_with("api") {
        return false;
    }
    path.extension().is_none()
}
