use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

use lechance_db::models::{Draw, GameDomain, Grid};

/// Fréquence et retard d'une valeur sur la fenêtre analysée.
/// Le retard est le nombre de tirages écoulés depuis la dernière
/// apparition (0 = vue au tirage le plus récent).
pub struct ValueStats {
    pub value: u8,
    pub frequency: u32,
    pub gap: u32,
}

/// Statistiques des boules principales sur une fenêtre de tirages,
/// du plus récent au plus ancien.
pub fn ball_stats(draws: &[Draw], domain: &GameDomain) -> Vec<ValueStats> {
    let GameDomain::Balls { lo, hi, .. } = domain else {
        return Vec::new();
    };
    let mut stats: Vec<ValueStats> = (*lo..=*hi)
        .map(|value| ValueStats { value, frequency: 0, gap: 0 })
        .collect();

    for (i, draw) in draws.iter().enumerate() {
        if let Grid::Balls { balls, .. } = &draw.grid {
            for &b in balls {
                let idx = (b - lo) as usize;
                if idx < stats.len() {
                    if stats[idx].frequency == 0 {
                        stats[idx].gap = i as u32;
                    }
                    stats[idx].frequency += 1;
                }
            }
        }
    }

    for stat in &mut stats {
        if stat.frequency == 0 {
            stat.gap = draws.len() as u32;
        }
    }

    stats
}

/// Fréquence de chaque chiffre par position, pour les jeux de chiffres.
pub fn digit_position_counts(draws: &[Draw], len: usize) -> Vec<[u32; 10]> {
    let mut counts = vec![[0u32; 10]; len];
    for draw in draws {
        if let Grid::Digits(digits) = &draw.grid {
            for (pos, &d) in digits.iter().enumerate().take(len) {
                if d <= 9 {
                    counts[pos][d as usize] += 1;
                }
            }
        }
    }
    counts
}

pub fn display_ball_stats(stats: &[ValueStats], window: u32) {
    println!("\n📊 Statistiques sur les {} derniers tirages\n", window);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", "Retard"]);

    let mut sorted: Vec<&ValueStats> = stats.iter().collect();
    sorted.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    for stat in sorted {
        table.add_row(vec![
            format!("{:2}", stat.value),
            stat.frequency.to_string(),
            stat.gap.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_digit_stats(counts: &[[u32; 10]], window: u32) {
    println!("\n📊 Fréquences par position sur les {} derniers tirages\n", window);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec!["Position".to_string()];
    header.extend((0..10).map(|d| d.to_string()));
    table.set_header(header);

    for (pos, row) in counts.iter().enumerate() {
        let mut cells = vec![pos.to_string()];
        cells.extend(row.iter().map(|c| c.to_string()));
        table.add_row(cells);
    }
    println!("{table}");
}
