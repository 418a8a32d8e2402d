use super::*;

fn scratch_path() -> PathBuf {
    std::env::temp_dir().join(format!("chamasys-store-{}", uuid::Uuid::new_v4())).join("token")
}

#[test]
fn missing_file_reads_as_no_token() {
    let store = FileTokenStore::new(scratch_path());
    assert_eq!(store.get(), None);
}

#[test]
fn set_creates_parent_and_round_trips() {
    let path = scratch_path();
    let store = FileTokenStore::new(&path);
    store.set("a.b.c");
    assert_eq!(store.get().as_deref(), Some("a.b.c"));
    assert_eq!(fs::read_to_string(&path).unwrap(), "a.b.c\n");

    store.set("d.e.f");
    assert_eq!(store.get().as_deref(), Some("d.e.f"));

    store.clear();
    assert_eq!(store.get(), None);
    assert!(!path.exists());
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn clear_without_file_is_quiet() {
    let store = FileTokenStore::new(scratch_path());
    store.clear();
    assert_eq!(store.get(), None);
}

#[test]
fn blank_file_reads_as_no_token() {
    let path = scratch_path();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "  \n").unwrap();
    assert_eq!(FileTokenStore::new(&path).get(), None);
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[cfg(unix)]
#[test]
fn token_file_is_private() {
    use std::os::unix::fs::PermissionsExt;
    let path = scratch_path();
    FileTokenStore::new(&path).set("a.b.c");
    let mode = fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
    let _ = fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn default_path_lives_under_home() {
    let path = default_token_path(Some(OsString::from("/home/amy"))).unwrap();
    assert_eq!(path, PathBuf::from("/home/amy/.chamasys/token"));
    assert_eq!(default_token_path(None), None);
    assert_eq!(default_token_path(Some(OsString::new())), None);
}
