use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            username    TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS places (
            id              TEXT PRIMARY KEY,
            user_id         TEXT NOT NULL REFERENCES users(id),
            country         TEXT NOT NULL,
            state_or_region TEXT,
            settlement      TEXT,
            name            TEXT,
            street          TEXT,
            house           TEXT
        );

        -- One vote per user and place; upserts rely on this constraint.
        CREATE TABLE IF NOT EXISTS votes (
            id          TEXT PRIMARY KEY,
            place_id    TEXT NOT NULL REFERENCES places(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id),
            type        TEXT NOT NULL CHECK (type IN ('UP', 'DOWN')),
            text        TEXT,
            UNIQUE(place_id, user_id)
        );

        CREATE INDEX IF NOT EXISTS idx_votes_place
            ON votes(place_id);

        CREATE TABLE IF NOT EXISTS likes (
            vote_id     TEXT NOT NULL REFERENCES votes(id) ON DELETE CASCADE,
            user_id     TEXT NOT NULL REFERENCES users(id),
            PRIMARY KEY (vote_id, user_id)
        );

        -- reply_id is a loose pointer: it may reference a reply that is gone.
        CREATE TABLE IF NOT EXISTS replies (
            id              TEXT PRIMARY KEY,
            vote_id         TEXT NOT NULL REFERENCES votes(id) ON DELETE CASCADE,
            user_id         TEXT NOT NULL REFERENCES users(id),
            text            TEXT NOT NULL,
            reply_id        TEXT,
            reply_user_id   TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_replies_vote
            ON replies(vote_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
