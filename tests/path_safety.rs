//! Writes must never land outside the source root, whatever the target
//! string or the links on disk say.

use rewrite_gate::{ApplyError, Config, ReplicationEngine, RewriteProposal};
use std::fs;
use tempfile::TempDir;

#[cfg(unix)]
use std::os::unix::fs::symlink;

fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/app.py"), "x = 1\n").unwrap();
    fs::write(dir.path().join("secrets.py"), "TOKEN = 'keep'\n").unwrap();
    dir
}

#[test]
fn test_parent_traversal_rejected() {
    let project = project();
    let engine = ReplicationEngine::new(project.path(), Config::default()).unwrap();
    let mut proposal = RewriteProposal::manual("../secrets.py", "x", "manual");

    let result = engine.apply_proposal(&mut proposal, "TOKEN = 'stolen'\n");

    assert!(matches!(result, Err(ApplyError::OutsideRoot(_))));
    assert_eq!(
        fs::read_to_string(project.path().join("secrets.py")).unwrap(),
        "TOKEN = 'keep'\n"
    );
    assert!(!project.path().join("secrets.py.bak").exists());
}

#[test]
fn test_nested_traversal_rejected() {
    let project = project();
    fs::create_dir_all(project.path().join("src/meta")).unwrap();
    let engine = ReplicationEngine::new(project.path(), Config::default()).unwrap();
    let mut proposal = RewriteProposal::manual("meta/../../secrets.py", "x", "manual");

    assert!(matches!(
        engine.apply_proposal(&mut proposal, "TOKEN = 'stolen'\n"),
        Err(ApplyError::OutsideRoot(_))
    ));
}

#[test]
fn test_traversal_inside_root_allowed() {
    let project = project();
    fs::create_dir_all(project.path().join("src/meta")).unwrap();
    let engine = ReplicationEngine::new(project.path(), Config::default()).unwrap();
    let mut proposal = RewriteProposal::manual("meta/../app.py", "x", "manual");

    assert!(engine.apply_proposal(&mut proposal, "x = 2\n").is_ok());
    assert_eq!(
        fs::read_to_string(project.path().join("src/app.py")).unwrap(),
        "x = 2\n"
    );
}

#[cfg(unix)]
#[test]
fn test_symlink_escape_rejected() {
    let project = project();
    symlink(
        project.path().join("secrets.py"),
        project.path().join("src/linked.py"),
    )
    .unwrap();
    let engine = ReplicationEngine::new(project.path(), Config::default()).unwrap();
    let mut proposal = RewriteProposal::manual("linked.py", "x", "manual");

    assert!(matches!(
        engine.apply_proposal(&mut proposal, "TOKEN = 'stolen'\n"),
        Err(ApplyError::OutsideRoot(_))
    ));
    assert_eq!(
        fs::read_to_string(project.path().join("secrets.py")).unwrap(),
        "TOKEN = 'keep'\n"
    );
}

#[cfg(unix)]
#[test]
fn test_symlinked_files_not_scanned() {
    let project = project();
    symlink(
        project.path().join("secrets.py"),
        project.path().join("src/linked.py"),
    )
    .unwrap();
    let engine = ReplicationEngine::new(project.path(), Config::default()).unwrap();

    let modules: Vec<_> = engine.scanner().unwrap().scan().collect();
    let names: Vec<_> = modules.iter().map(|m| m.filename.as_str()).collect();
    assert_eq!(names, vec!["app.py"]);
}

#[test]
fn test_existing_backup_blocks_apply() {
    let project = project();
    fs::write(project.path().join("src/app.py.bak"), "older backup").unwrap();
    let engine = ReplicationEngine::new(project.path(), Config::default()).unwrap();
    let mut proposal = RewriteProposal::manual("app.py", "x", "manual");

    assert!(matches!(
        engine.apply_proposal(&mut proposal, "x = 2\n"),
        Err(ApplyError::Backup { .. })
    ));
    assert_eq!(
        fs::read_to_string(project.path().join("src/app.py")).unwrap(),
        "x = 1\n"
    );
    assert_eq!(
        fs::read_to_string(project.path().join("src/app.py.bak")).unwrap(),
        "older backup"
    );
}
