//! SQL text shared by the warehouse backends.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::Post;

/// Creates the local table if absent. Only the local development file is
/// bootstrapped this way; the production table is provisioned externally.
pub const LOCAL_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS reddit_posts (
    post_id      TEXT    NOT NULL,
    title        TEXT    NOT NULL,
    author       TEXT    NOT NULL,
    score        INTEGER NOT NULL,
    num_comments INTEGER NOT NULL,
    url          TEXT    NOT NULL,
    permalink    TEXT    NOT NULL,
    created_utc  TEXT    NOT NULL,
    scraped_at   TEXT    NOT NULL,
    load_date    TEXT    NOT NULL,
    PRIMARY KEY (post_id, load_date)
)
"#;

/// Upsert for the local backend. `date('now')` is the UTC calendar date.
pub const LOCAL_UPSERT: &str = r#"
INSERT INTO reddit_posts
    (post_id, title, author, score, num_comments, url, permalink, created_utc, scraped_at, load_date)
VALUES
    (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, date('now'))
ON CONFLICT (post_id, load_date) DO UPDATE SET
    score = excluded.score,
    num_comments = excluded.num_comments,
    scraped_at = excluded.scraped_at
"#;

/// Render a Snowflake `MERGE` for one post against `table`.
///
/// The Snowflake client executes plain text, so every value is rendered as
/// an escaped literal. `table` must already be a validated identifier.
pub fn merge_statement(table: &str, post: &Post) -> String {
    format!(
        "MERGE INTO {table} AS target \
         USING (SELECT {post_id} AS post_id, {title} AS title, {author} AS author, \
                {score} AS score, {num_comments} AS num_comments, {url} AS url, \
                {permalink} AS permalink, {created_utc} AS created_utc, \
                {scraped_at} AS scraped_at, CURRENT_DATE() AS load_date) AS source \
         ON target.post_id = source.post_id AND target.load_date = source.load_date \
         WHEN MATCHED THEN UPDATE SET \
             score = source.score, \
             num_comments = source.num_comments, \
             scraped_at = source.scraped_at \
         WHEN NOT MATCHED THEN INSERT \
             (post_id, title, author, score, num_comments, url, permalink, created_utc, scraped_at, load_date) \
         VALUES \
             (source.post_id, source.title, source.author, source.score, source.num_comments, \
              source.url, source.permalink, source.created_utc, source.scraped_at, source.load_date)",
        post_id = string_literal(&post.post_id),
        title = string_literal(&post.title),
        author = string_literal(&post.author),
        score = post.score,
        num_comments = post.num_comments,
        url = string_literal(&post.url),
        permalink = string_literal(&post.permalink),
        created_utc = timestamp_literal(&post.created_utc),
        scraped_at = timestamp_literal(&post.scraped_at),
    )
}

/// Single-quoted string literal. Snowflake treats backslash as an escape
/// character inside quotes, so it is doubled along with the quote.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '\\' => out.push_str("\\\\"),
            '\0' => {}
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn timestamp_literal(ts: &DateTime<Utc>) -> String {
    format!(
        "TO_TIMESTAMP_TZ('{}')",
        ts.to_rfc3339_opts(SecondsFormat::Micros, false)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_post() -> Post {
        Post {
            post_id: "abc123".to_string(),
            title: "Isn't it \\ great".to_string(),
            author: "u".to_string(),
            score: 150,
            num_comments: 42,
            url: "https://x".to_string(),
            permalink: "https://reddit.com/r/Foo/comments/abc123/t/".to_string(),
            created_utc: Utc.with_ymd_and_hms(2024, 2, 8, 13, 46, 40).unwrap(),
            scraped_at: Utc.with_ymd_and_hms(2026, 10, 16, 6, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("plain"), "'plain'");
        assert_eq!(string_literal("it's"), "'it''s'");
        assert_eq!(string_literal(r"a\b"), r"'a\\b'");
        assert_eq!(string_literal("x'); DROP TABLE t; --"), "'x''); DROP TABLE t; --'");
        assert_eq!(string_literal("nul\0byte"), "'nulbyte'");
    }

    #[test]
    fn test_merge_statement_keys_on_post_and_load_date() {
        let sql = merge_statement("RAW.REDDIT_POSTS", &sample_post());

        assert!(sql.starts_with("MERGE INTO RAW.REDDIT_POSTS AS target"));
        assert!(sql.contains("'abc123' AS post_id"));
        assert!(sql.contains("CURRENT_DATE() AS load_date"));
        assert!(sql.contains(
            "ON target.post_id = source.post_id AND target.load_date = source.load_date"
        ));
        assert!(sql.contains("'Isn''t it \\\\ great' AS title"));
        assert!(sql.contains("TO_TIMESTAMP_TZ('2024-02-08T13:46:40.000000+00:00') AS created_utc"));
    }

    #[test]
    fn test_merge_updates_only_mutable_columns() {
        let sql = merge_statement("RAW.REDDIT_POSTS", &sample_post());
        let update = sql
            .split("WHEN MATCHED THEN UPDATE SET")
            .nth(1)
            .and_then(|rest| rest.split("WHEN NOT MATCHED").next())
            .unwrap();

        assert!(update.contains("score = source.score"));
        assert!(update.contains("num_comments = source.num_comments"));
        assert!(update.contains("scraped_at = source.scraped_at"));
        assert!(!update.contains("title"));
        assert!(!update.contains("permalink"));
    }
}
