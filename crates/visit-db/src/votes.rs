use anyhow::Result;
use rusqlite::Connection;
use visit_types::models::VoteType;

use crate::places::place_exists;
use crate::queries::OptionalExt;
use crate::Database;

impl Database {
    // -- Votes --

    /// Casts or changes `user_id`'s vote in one statement. The vote keeps its id,
    /// text, likes and replies when only the type changes.
    /// Returns false if the place does not exist.
    pub fn upsert_vote(
        &self,
        id: &str,
        place_id: &str,
        user_id: &str,
        vote_type: VoteType,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "INSERT INTO votes (id, place_id, user_id, type)
                 SELECT ?1, ?2, ?3, ?4 WHERE EXISTS (SELECT 1 FROM places WHERE id = ?2)
                 ON CONFLICT(place_id, user_id) DO UPDATE SET type = excluded.type",
                (id, place_id, user_id, vote_type.as_str()),
            )?;
            Ok(changed > 0)
        })
    }

    /// Removes `user_id`'s vote along with its comment, likes and replies.
    /// Returns false if the place does not exist.
    pub fn remove_vote(&self, place_id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            if !place_exists(&tx, place_id)? {
                return Ok(false);
            }
            tx.execute(
                "DELETE FROM votes WHERE place_id = ?1 AND user_id = ?2",
                (place_id, user_id),
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    /// Sets or clears the comment of a vote owned by `user_id`.
    /// Returns false if no such vote exists.
    pub fn set_vote_text(
        &self,
        place_id: &str,
        vote_id: &str,
        user_id: &str,
        text: Option<&str>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE votes SET text = ?4 WHERE place_id = ?1 AND id = ?2 AND user_id = ?3",
                (place_id, vote_id, user_id, text),
            )?;
            Ok(changed > 0)
        })
    }

    // -- Likes --

    /// Toggle a like: removes if exists, inserts if not.
    /// Returns whether the like was added, or `None` if the vote is gone.
    pub fn toggle_like(&self, vote_id: &str, user_id: &str) -> Result<Option<bool>> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            if !vote_exists(&tx, vote_id)? {
                return Ok(None);
            }
            let existing: Option<String> = tx
                .query_row(
                    "SELECT vote_id FROM likes WHERE vote_id = ?1 AND user_id = ?2",
                    (vote_id, user_id),
                    |row| row.get(0),
                )
                .optional()?;

            let added = if existing.is_some() {
                tx.execute(
                    "DELETE FROM likes WHERE vote_id = ?1 AND user_id = ?2",
                    (vote_id, user_id),
                )?;
                false
            } else {
                tx.execute(
                    "INSERT INTO likes (vote_id, user_id) VALUES (?1, ?2)",
                    (vote_id, user_id),
                )?;
                true
            };
            tx.commit()?;
            Ok(Some(added))
        })
    }

    // -- Replies --

    /// Returns false, storing nothing, if the vote is gone.
    pub fn insert_reply(
        &self,
        id: &str,
        vote_id: &str,
        user_id: &str,
        text: &str,
        reply_id: Option<&str>,
        reply_user_id: Option<&str>,
    ) -> Result<bool> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            if !vote_exists(&tx, vote_id)? {
                return Ok(false);
            }
            tx.execute(
                "INSERT INTO replies (id, vote_id, user_id, text, reply_id, reply_user_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                (id, vote_id, user_id, text, reply_id, reply_user_id),
            )?;
            tx.commit()?;
            Ok(true)
        })
    }

    /// Deletes a reply written by `user_id`. Returns false if there was none.
    pub fn delete_reply(&self, vote_id: &str, id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM replies WHERE vote_id = ?1 AND id = ?2 AND user_id = ?3",
                (vote_id, id, user_id),
            )?;
            Ok(changed > 0)
        })
    }
}

fn vote_exists(conn: &Connection, id: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM votes WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visit_core::id::new_id;
    use visit_types::models::{Address, Place};

    struct Fixture {
        db: Database,
        place: String,
        alice: String,
        bob: String,
    }

    fn fixture() -> Fixture {
        let db = Database::open_in_memory().unwrap();
        let alice = new_id().to_string();
        let bob = new_id().to_string();
        db.create_user(&alice, "alice", "hash").unwrap();
        db.create_user(&bob, "bob", "hash").unwrap();
        let place = new_id().to_string();
        let address = Address {
            country: "Russia".into(),
            ..Default::default()
        };
        db.insert_place(&place, &alice, &address).unwrap();
        Fixture {
            db,
            place,
            alice,
            bob,
        }
    }

    impl Fixture {
        fn load(&self) -> Place {
            self.db.place(&self.place).unwrap().unwrap()
        }
    }

    #[test]
    fn revoting_overwrites_instead_of_duplicating() {
        let f = fixture();
        let first = new_id().to_string();
        assert!(f.db.upsert_vote(&first, &f.place, &f.bob, VoteType::Up).unwrap());
        assert!(f
            .db
            .upsert_vote(&new_id().to_string(), &f.place, &f.bob, VoteType::Down)
            .unwrap());

        let votes = f.load().votes;
        assert_eq!(votes.len(), 1);
        assert_eq!(votes[0].vote_type, VoteType::Down);
        assert_eq!(votes[0].id.to_string(), first);
    }

    #[test]
    fn voting_on_a_missing_place_changes_nothing() {
        let f = fixture();
        let missing = new_id().to_string();
        assert!(!f
            .db
            .upsert_vote(&new_id().to_string(), &missing, &f.bob, VoteType::Up)
            .unwrap());
        assert!(!f.db.remove_vote(&missing, &f.bob).unwrap());
    }

    #[test]
    fn comment_survives_type_change_and_dies_with_the_vote() {
        let f = fixture();
        let vote = new_id().to_string();
        f.db.upsert_vote(&vote, &f.place, &f.bob, VoteType::Up).unwrap();
        assert!(f.db.set_vote_text(&f.place, &vote, &f.bob, Some("lovely")).unwrap());
        assert!(!f.db.set_vote_text(&f.place, &vote, &f.alice, Some("hijack")).unwrap());

        f.db.upsert_vote(&new_id().to_string(), &f.place, &f.bob, VoteType::Down)
            .unwrap();
        assert_eq!(f.load().votes[0].text.as_deref(), Some("lovely"));

        f.db.toggle_like(&vote, &f.alice).unwrap();
        f.db.insert_reply(&new_id().to_string(), &vote, &f.alice, "why?", None, None)
            .unwrap();
        assert!(f.db.remove_vote(&f.place, &f.bob).unwrap());
        assert!(f.load().votes.is_empty());
    }

    #[test]
    fn likes_toggle() {
        let f = fixture();
        let vote = new_id().to_string();
        f.db.upsert_vote(&vote, &f.place, &f.bob, VoteType::Up).unwrap();

        assert_eq!(f.db.toggle_like(&vote, &f.alice).unwrap(), Some(true));
        assert_eq!(f.load().votes[0].likes.len(), 1);
        assert_eq!(f.db.toggle_like(&vote, &f.alice).unwrap(), Some(false));
        assert!(f.load().votes[0].likes.is_empty());
    }

    #[test]
    fn replies_keep_dangling_parents_and_only_authors_delete() {
        let f = fixture();
        let vote = new_id().to_string();
        f.db.upsert_vote(&vote, &f.place, &f.bob, VoteType::Up).unwrap();

        let reply = new_id().to_string();
        let ghost = new_id().to_string();
        assert!(f
            .db
            .insert_reply(&reply, &vote, &f.alice, "who?", Some(&ghost), None)
            .unwrap());
        let place = f.load();
        let stored = &place.votes[0].replies[0];
        assert_eq!(stored.reply_id.map(|id| id.to_string()), Some(ghost));

        assert!(!f.db.delete_reply(&vote, &reply, &f.bob).unwrap());
        assert!(f.db.delete_reply(&vote, &reply, &f.alice).unwrap());
        assert!(f.load().votes[0].replies.is_empty());
    }

    #[test]
    fn withdrawn_votes_take_no_likes_or_replies() {
        let f = fixture();
        let vote = new_id().to_string();
        f.db.upsert_vote(&vote, &f.place, &f.bob, VoteType::Up).unwrap();
        assert!(f.db.remove_vote(&f.place, &f.bob).unwrap());

        assert_eq!(f.db.toggle_like(&vote, &f.alice).unwrap(), None);
        assert!(!f
            .db
            .insert_reply(&new_id().to_string(), &vote, &f.alice, "late", None, None)
            .unwrap());
        assert!(f.load().votes.is_empty());
    }

    #[test]
    fn owner_vote_alone_keeps_place_mutable() {
        let f = fixture();
        let address = Address {
            country: "France".into(),
            ..Default::default()
        };
        f.db.upsert_vote(&new_id().to_string(), &f.place, &f.alice, VoteType::Up)
            .unwrap();
        assert!(f.db.update_place_guarded(&f.place, &f.alice, &address).unwrap());

        f.db.upsert_vote(&new_id().to_string(), &f.place, &f.bob, VoteType::Up)
            .unwrap();
        assert!(!f.db.update_place_guarded(&f.place, &f.alice, &address).unwrap());
        assert!(!f.db.delete_place_guarded(&f.place, &f.alice).unwrap());
    }
}
