use personbook_core::db::open_db_in_memory;
use personbook_core::{
    flush_logging, init_logging, PersonService, RepoError, SqlitePersonRepository,
};
use std::path::Path;

// Runs in its own binary: the logger is process-global.
#[test]
fn facade_failure_is_logged_once_at_error() {
    let log_root = tempfile::tempdir().unwrap();
    let log_dir = log_root.path().join("logs");
    init_logging("info", log_dir.to_str().unwrap()).unwrap();

    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePersonRepository::try_new(&conn).unwrap();
    conn.execute_batch("DROP TABLE people;").unwrap();
    let service = PersonService::new(repo);

    let err = service.find_people_by_name("Ada").unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
    flush_logging();

    let logs = read_logs(&log_dir);
    let failures: Vec<_> = logs
        .lines()
        .filter(|line| {
            line.contains("event=find_people_by_name module=person_service status=error")
        })
        .collect();
    assert_eq!(failures.len(), 1, "log contents:\n{logs}");
    assert!(failures[0].contains("ERROR"), "unexpected line: {}", failures[0]);
    assert!(failures[0].contains("no such table"), "unexpected line: {}", failures[0]);
}

fn read_logs(dir: &Path) -> String {
    let mut contents = String::new();
    for entry in std::fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_file() {
            contents.push_str(&std::fs::read_to_string(&path).unwrap());
        }
    }
    contents
}
