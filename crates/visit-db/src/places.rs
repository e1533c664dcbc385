use anyhow::Result;
use rusqlite::{params_from_iter, Connection};
use visit_types::models::{Address, Place};

use crate::documents::assemble;
use crate::models::{LikeRow, PlaceRow, ReplyRow, VoteRow};
use crate::Database;

const SEARCHABLE: [&str; 6] = [
    "country",
    "state_or_region",
    "settlement",
    "name",
    "street",
    "house",
];

/// Nobody but the owner has voted. Expects the place id as `?1` and the owner as `?2`.
const ONLY_OWNER_VOTED: &str =
    "NOT EXISTS (SELECT 1 FROM votes WHERE place_id = ?1 AND user_id <> ?2)";

/// SQL condition on `places` and its parameters.
struct Filter {
    condition: String,
    params: Vec<String>,
}

impl Filter {
    fn by_id(id: &str) -> Self {
        Self {
            condition: "id = ?1".into(),
            params: vec![id.to_string()],
        }
    }

    /// Matches places where any term occurs in any address field.
    fn search(text: Option<&str>) -> Self {
        let terms: Vec<&str> = text.unwrap_or_default().split_whitespace().collect();
        if terms.is_empty() {
            return Self {
                condition: "1".into(),
                params: vec![],
            };
        }

        let condition = (1..=terms.len())
            .map(|i| {
                let fields: Vec<String> = SEARCHABLE
                    .iter()
                    .map(|f| format!("{} LIKE ?{} ESCAPE '\\'", f, i))
                    .collect();
                format!("({})", fields.join(" OR "))
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        let params = terms.iter().map(|t| format!("%{}%", escape_like(t))).collect();

        Self { condition, params }
    }
}

fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl Database {
    pub fn insert_place(&self, id: &str, user_id: &str, address: &Address) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO places (id, user_id, country, state_or_region, settlement, name, street, house)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    id,
                    user_id,
                    address.country,
                    address.state_or_region,
                    address.settlement,
                    address.name,
                    address.street,
                    address.house,
                ],
            )?;
            Ok(())
        })
    }

    /// All places matching an optional text search, with their votes.
    pub fn places(&self, search: Option<&str>) -> Result<Vec<Place>> {
        self.with_conn(|conn| load_places(conn, &Filter::search(search)))
    }

    pub fn place(&self, id: &str) -> Result<Option<Place>> {
        self.with_conn(|conn| Ok(load_places(conn, &Filter::by_id(id))?.pop()))
    }

    /// Replaces the address unless `owner` doesn't own the place or someone else
    /// has voted on it. Returns whether the place was updated.
    pub fn update_place_guarded(&self, id: &str, owner: &str, address: &Address) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                &format!(
                    "UPDATE places
                     SET country = ?3, state_or_region = ?4, settlement = ?5, name = ?6, street = ?7, house = ?8
                     WHERE id = ?1 AND user_id = ?2 AND {}",
                    ONLY_OWNER_VOTED
                ),
                rusqlite::params![
                    id,
                    owner,
                    address.country,
                    address.state_or_region,
                    address.settlement,
                    address.name,
                    address.street,
                    address.house,
                ],
            )?;
            Ok(changed == 1)
        })
    }

    /// Deletes the place with everything attached to it, under the same rule
    /// as [`Database::update_place_guarded`].
    pub fn delete_place_guarded(&self, id: &str, owner: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                &format!(
                    "DELETE FROM places WHERE id = ?1 AND user_id = ?2 AND {}",
                    ONLY_OWNER_VOTED
                ),
                (id, owner),
            )?;
            Ok(changed == 1)
        })
    }
}

pub(crate) fn place_exists(conn: &Connection, id: &str) -> Result<bool> {
    let exists = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM places WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

fn load_places(conn: &Connection, filter: &Filter) -> Result<Vec<Place>> {
    let places_in = format!("SELECT id FROM places WHERE {}", filter.condition);
    let votes_in = format!("SELECT id FROM votes WHERE place_id IN ({})", places_in);

    let mut stmt = conn.prepare(&format!(
        "SELECT id, user_id, country, state_or_region, settlement, name, street, house
         FROM places WHERE {} ORDER BY rowid",
        filter.condition
    ))?;
    let places = stmt
        .query_map(params_from_iter(&filter.params), |row| {
            Ok(PlaceRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                country: row.get(2)?,
                state_or_region: row.get(3)?,
                settlement: row.get(4)?,
                name: row.get(5)?,
                street: row.get(6)?,
                house: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    if places.is_empty() {
        return Ok(vec![]);
    }

    let mut stmt = conn.prepare(&format!(
        "SELECT id, place_id, user_id, type, text FROM votes
         WHERE place_id IN ({}) ORDER BY rowid",
        places_in
    ))?;
    let votes = stmt
        .query_map(params_from_iter(&filter.params), |row| {
            Ok(VoteRow {
                id: row.get(0)?,
                place_id: row.get(1)?,
                user_id: row.get(2)?,
                vote_type: row.get(3)?,
                text: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(&format!(
        "SELECT vote_id, user_id FROM likes WHERE vote_id IN ({}) ORDER BY rowid",
        votes_in
    ))?;
    let likes = stmt
        .query_map(params_from_iter(&filter.params), |row| {
            Ok(LikeRow {
                vote_id: row.get(0)?,
                user_id: row.get(1)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let mut stmt = conn.prepare(&format!(
        "SELECT id, vote_id, user_id, text, reply_id, reply_user_id FROM replies
         WHERE vote_id IN ({}) ORDER BY rowid",
        votes_in
    ))?;
    let replies = stmt
        .query_map(params_from_iter(&filter.params), |row| {
            Ok(ReplyRow {
                id: row.get(0)?,
                vote_id: row.get(1)?,
                user_id: row.get(2)?,
                text: row.get(3)?,
                reply_id: row.get(4)?,
                reply_user_id: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    assemble(places, votes, likes, replies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use visit_core::id::new_id;

    fn address(country: &str, settlement: Option<&str>) -> Address {
        Address {
            country: country.into(),
            state_or_region: settlement.map(|_| "Region".into()),
            settlement: settlement.map(Into::into),
            ..Default::default()
        }
    }

    fn setup() -> (Database, String) {
        let db = Database::open_in_memory().unwrap();
        let owner = new_id().to_string();
        db.create_user(&owner, "owner", "hash").unwrap();
        (db, owner)
    }

    #[test]
    fn places_round_trip_through_storage() {
        let (db, owner) = setup();
        let id = new_id().to_string();
        let addr = address("Russia", Some("Kazan"));
        db.insert_place(&id, &owner, &addr).unwrap();

        let place = db.place(&id).unwrap().unwrap();
        assert_eq!(place.id.to_string(), id);
        assert_eq!(place.user_id.to_string(), owner);
        assert_eq!(place.address, addr);
        assert!(place.votes.is_empty());
        assert!(db.place(&new_id().to_string()).unwrap().is_none());
    }

    #[test]
    fn search_matches_any_term_in_any_field() {
        let (db, owner) = setup();
        db.insert_place(&new_id().to_string(), &owner, &address("Russia", Some("Kazan")))
            .unwrap();
        db.insert_place(&new_id().to_string(), &owner, &address("France", Some("Lyon")))
            .unwrap();
        db.insert_place(&new_id().to_string(), &owner, &address("Japan", None))
            .unwrap();

        assert_eq!(db.places(None).unwrap().len(), 3);
        assert_eq!(db.places(Some("   ")).unwrap().len(), 3);
        assert_eq!(db.places(Some("kazan")).unwrap().len(), 1);
        assert_eq!(db.places(Some("lyon japan")).unwrap().len(), 2);
        assert!(db.places(Some("100%")).unwrap().is_empty());
        assert!(db.places(Some("_")).unwrap().is_empty());
    }

    #[test]
    fn guarded_mutation_requires_owner() {
        let (db, owner) = setup();
        let stranger = new_id().to_string();
        db.create_user(&stranger, "stranger", "hash").unwrap();
        let id = new_id().to_string();
        db.insert_place(&id, &owner, &address("Russia", None)).unwrap();

        let moved = address("France", None);
        assert!(!db.update_place_guarded(&id, &stranger, &moved).unwrap());
        assert!(db.update_place_guarded(&id, &owner, &moved).unwrap());
        assert_eq!(db.place(&id).unwrap().unwrap().address.country, "France");

        assert!(!db.delete_place_guarded(&id, &stranger).unwrap());
        assert!(db.delete_place_guarded(&id, &owner).unwrap());
        assert!(db.place(&id).unwrap().is_none());
    }
}
