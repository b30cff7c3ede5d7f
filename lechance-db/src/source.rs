use anyhow::Result;
use rusqlite::Connection;

use crate::db::fetch_history;
use crate::models::{validate_grid, Draw, Game};

/// Source d'historique pour un jeu : expose la séquence canonique des
/// tirages, en ordre de date strictement croissant. Le format de stockage
/// reste l'affaire de l'implémentation.
pub trait HistorySource {
    fn game(&self) -> Game;
    fn load_sequence(&self) -> Result<Vec<Draw>>;
}

/// Source SQLite du Loto. Les lignes hors domaine sont écartées au
/// chargement et signalées sur stderr.
pub struct SqliteLotoSource<'a> {
    conn: &'a Connection,
}

/// Source SQLite du Joker.
pub struct SqliteJokerSource<'a> {
    conn: &'a Connection,
}

impl HistorySource for SqliteLotoSource<'_> {
    fn game(&self) -> Game {
        Game::Loto
    }

    fn load_sequence(&self) -> Result<Vec<Draw>> {
        load_valid(self.conn, Game::Loto)
    }
}

impl HistorySource for SqliteJokerSource<'_> {
    fn game(&self) -> Game {
        Game::Joker
    }

    fn load_sequence(&self) -> Result<Vec<Draw>> {
        load_valid(self.conn, Game::Joker)
    }
}

fn load_valid(conn: &Connection, game: Game) -> Result<Vec<Draw>> {
    let domain = game.domain();
    let mut valid = Vec::new();
    for draw in fetch_history(conn, game)? {
        match validate_grid(&draw.grid, &domain) {
            Ok(()) => valid.push(draw),
            Err(e) => eprintln!("Tirage {} écarté : {}", draw.draw_id, e),
        }
    }
    Ok(valid)
}

/// Registre des sources : chaque jeu a sa source typée, pas de découverte
/// de schéma par convention de nommage.
pub fn source_for(conn: &Connection, game: Game) -> Box<dyn HistorySource + '_> {
    match game {
        Game::Loto => Box::new(SqliteLotoSource { conn }),
        Game::Joker => Box::new(SqliteJokerSource { conn }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{insert_draw, migrate};
    use crate::models::Grid;

    #[test]
    fn test_source_for_game() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(source_for(&conn, Game::Loto).game(), Game::Loto);
        assert_eq!(source_for(&conn, Game::Joker).game(), Game::Joker);
    }

    #[test]
    fn test_load_sequence_ascending() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        for (id, date) in [("002", "2024-01-05"), ("001", "2024-01-01")] {
            insert_draw(
                &conn,
                Game::Loto,
                &Draw {
                    draw_id: id.to_string(),
                    date: date.to_string(),
                    grid: Grid::Balls { balls: [1, 2, 3, 4, 5], bonus: 1 },
                },
            )
            .unwrap();
        }

        let seq = source_for(&conn, Game::Loto).load_sequence().unwrap();
        assert_eq!(seq.len(), 2);
        assert!(seq[0].date < seq[1].date);
    }

    #[test]
    fn test_invalid_rows_discarded() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        // Insertion directe d'une ligne hors domaine (boule 99)
        conn.execute(
            "INSERT INTO loto_draws (draw_id, date, ball_1, ball_2, ball_3, ball_4, ball_5, chance)
             VALUES ('bad', '2024-01-01', 99, 2, 3, 4, 5, 1)",
            [],
        )
        .unwrap();
        insert_draw(
            &conn,
            Game::Loto,
            &Draw {
                draw_id: "ok".to_string(),
                date: "2024-01-02".to_string(),
                grid: Grid::Balls { balls: [1, 2, 3, 4, 5], bonus: 1 },
            },
        )
        .unwrap();

        let seq = source_for(&conn, Game::Loto).load_sequence().unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq[0].draw_id, "ok");
    }
}
