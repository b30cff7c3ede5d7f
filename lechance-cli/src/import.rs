use anyhow::{bail, Context, Result};
use lechance_db::rusqlite::Connection;
use std::path::Path;

use lechance_db::db::insert_draw;
use lechance_db::models::{parse_digits, validate_grid, Draw, Game, GameDomain, Grid};

/// Colonnes des fichiers officiels FDJ (séparateur ';') :
/// 0 = identifiant du tirage, 2 = date JJ/MM/AAAA,
/// Loto : 4..8 = boules, 9 = numéro chance ; Joker : 4 = les 7 chiffres.
fn parse_record(record: &csv::StringRecord, game: Game) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let draw_id = get(0)?;
    let date = parse_date(&get(2)?)?;

    let grid = match game {
        Game::Loto => {
            let mut balls: [u8; 5] = [
                get_u8(4)?,
                get_u8(5)?,
                get_u8(6)?,
                get_u8(7)?,
                get_u8(8)?,
            ];
            balls.sort();
            Grid::Balls { balls, bonus: get_u8(9)? }
        }
        Game::Joker => {
            let GameDomain::Digits { len } = game.domain() else {
                bail!("Domaine inattendu pour le Joker");
            };
            Grid::Digits(parse_digits(&get(4)?, len)?)
        }
    };

    validate_grid(&grid, &game.domain())?;

    Ok(Draw { draw_id, date, grid })
}

fn parse_date(raw: &str) -> Result<String> {
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        bail!("Format de date invalide : '{}'", raw);
    }
    Ok(format!("{}-{}-{}", parts[2], parts[1], parts[0]))
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, game: Game, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record, game) {
                Ok(draw) => match insert_draw(&tx, game, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        eprintln!("Erreur insertion tirage {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("17/02/2026").unwrap(), "2026-02-17");
        assert_eq!(parse_date("01/01/2020").unwrap(), "2020-01-01");
        assert!(parse_date("2020-01-01").is_err());
    }

    #[test]
    fn test_parse_loto_record() {
        let rec = record(&[
            "2024001", "SAMEDI", "06/01/2024", "06/03/2024", "12", "3", "27", "41", "8", "7",
        ]);
        let draw = parse_record(&rec, Game::Loto).unwrap();
        assert_eq!(draw.draw_id, "2024001");
        assert_eq!(draw.date, "2024-01-06");
        assert_eq!(draw.grid, Grid::Balls { balls: [3, 8, 12, 27, 41], bonus: 7 });
    }

    #[test]
    fn test_parse_joker_record() {
        let rec = record(&["2024001", "SAMEDI", "06/01/2024", "", "4178203"]);
        let draw = parse_record(&rec, Game::Joker).unwrap();
        assert_eq!(draw.grid, Grid::Digits(vec![4, 1, 7, 8, 2, 0, 3]));
    }

    #[test]
    fn test_parse_record_rejects_out_of_domain() {
        let rec = record(&[
            "2024001", "SAMEDI", "06/01/2024", "", "12", "3", "27", "41", "99", "7",
        ]);
        assert!(parse_record(&rec, Game::Loto).is_err());

        let rec = record(&["2024001", "SAMEDI", "06/01/2024", "", "12", "3", "27", "41", "8", "11"]);
        assert!(parse_record(&rec, Game::Loto).is_err());
    }

    #[test]
    fn test_import_csv_accounting() {
        use lechance_db::db::{count_draws, migrate};
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loto.csv");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "annee_numero_de_tirage;jour_de_tirage;date_de_tirage;date_de_forclusion;boule_1;boule_2;boule_3;boule_4;boule_5;numero_chance").unwrap();
        writeln!(f, "2024001;SAMEDI;06/01/2024;;12;3;27;41;8;7").unwrap();
        writeln!(f, "2024002;LUNDI;08/01/2024;;1;2;3;4;5;1").unwrap();
        // Doublon
        writeln!(f, "2024001;SAMEDI;06/01/2024;;12;3;27;41;8;7").unwrap();
        // Hors domaine
        writeln!(f, "2024003;MERCREDI;10/01/2024;;1;2;3;4;99;1").unwrap();

        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let result = import_csv(&conn, Game::Loto, &path).unwrap();

        assert_eq!(result.total_records, 4);
        assert_eq!(result.inserted, 2);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.errors, 1);
        assert_eq!(count_draws(&conn, Game::Loto).unwrap(), 2);
    }
}
