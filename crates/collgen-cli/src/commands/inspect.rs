//! Inspect command: score database statistics.

use anyhow::Result;
use collgen_core::replay::Score;

use super::load_store;

pub fn run(scores_path: &str, user: Option<&str>, json: bool) -> Result<()> {
    let store = load_store(scores_path)?;

    let Some(user) = user else {
        if json {
            let summary = serde_json::json!({
                "beatmaps": store.beatmap_count(),
                "scores": store.score_count(),
                "high_scores": store.high_scores().len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("Beatmaps:    {}", store.beatmap_count());
            println!("Scores:      {}", store.score_count());
            println!("High scores: {}", store.high_scores().len());
        }
        return Ok(());
    };

    let scores = store.best_scores_by_username(user);
    if json {
        println!("{}", serde_json::to_string_pretty(&scores)?);
    } else {
        println!("{} best scores for {}", scores.len(), user);
        for score in &scores {
            println!("{}", format_score_line(score));
        }
    }
    Ok(())
}

fn format_score_line(score: &Score) -> String {
    let mods = score.mods.short_names();
    let played = score
        .played_at
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{}  {:<10} {:>10}  {:>6.2}%  {:<9} {}",
        score.map_hash,
        if mods.is_empty() { "NM" } else { mods.as_str() },
        score.total_score,
        score.accuracy() * 100.0,
        score.mode.name(),
        played
    )
}
