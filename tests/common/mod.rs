use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

pub const HEADER: &str = "id,title,budget,revenue,vote_average,release_date,original_language,genres,production_companies";

/// Six movies covering multi-genre rows, empty and absent lists, missing values and an
/// unparseable date.
pub const MOVIES: &[&str] = &[
    r#"19995,Avatar,237000000,2787965087,7.2,2009-12-10,en,"[{'id': 28, 'name': 'Action'}, {'id': 12, 'name': 'Adventure'}, {'id': 14, 'name': 'Fantasy'}]","[{'id': 289, 'name': 'Ingenious Film Partners'}, {'id': 306, 'name': 'Twentieth Century Fox Film Corporation'}]""#,
    r#"285,Pirates of the Caribbean: At World's End,300000000,961000000,6.9,2007-05-19,en,"[{'id': 12, 'name': 'Adventure'}, {'id': 14, 'name': 'Fantasy'}, {'id': 28, 'name': 'Action'}]","[{'id': 2, 'name': 'Walt Disney Pictures'}, {'id': 130, 'name': 'Jerry Bruckheimer Films'}]""#,
    r#"206647,Spectre,245000000,880674609,6.3,2015-10-26,en,"[{'id': 28, 'name': 'Action'}, {'id': 12, 'name': 'Adventure'}, {'id': 80, 'name': 'Crime'}]","[{'id': 5, 'name': 'Columbia Pictures'}]""#,
    r#"1865,Amélie,10000000,173921954,7.8,2001-04-25,fr,"[{'id': 35, 'name': 'Comedy'}, {'id': 10749, 'name': 'Romance'}]","[{'id': 5, 'name': 'Columbia Pictures'}]""#,
    r#"9999,Untitled Project,0,0,,not-a-date,en,[],"#,
    r#"4321,Quiet Drama,,12,5.0,2009-01-01,de,"[{'id': 18, 'name': 'Drama'}]",[]"#,
];

pub fn movies_csv_body() -> String {
    let mut body = String::from(HEADER);
    for row in MOVIES {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    body
}

/// Write `body` to `name` inside a fresh temp dir. Keep the dir alive for the test.
pub fn write_csv(name: &str, body: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, body).expect("Failed to write csv");
    (dir, path)
}

pub fn write_movies_csv() -> (TempDir, PathBuf) {
    write_csv("movies.csv", &movies_csv_body())
}
