use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::deck::Deck;

/// Run the check command.
pub fn run(file: &Path) -> Result<()> {
    let deck = Deck::load(file)?;

    println!("{}", deck.title.bold());
    println!("{} slide(s)", deck.slide_count());
    for (i, heading) in slide_lines(&deck).iter().enumerate() {
        println!("  {:>2}. {heading}", i + 1);
    }

    match deck.music_path() {
        Some(music) => println!("Music: {}", music.display()),
        None => println!("Music: {}", "none".dimmed()),
    }
    if let Some(line) = clip_line(&deck) {
        println!("{line}");
    }

    let warnings = deck.warnings();
    println!();
    if warnings.is_empty() {
        println!("{}", "Deck is ready to present.".green().bold());
    } else {
        for warning in &warnings {
            println!("{} {warning}", "warning:".yellow().bold());
        }
        println!(
            "{}",
            format!("{} warning(s); the deck will still run.", warnings.len()).yellow()
        );
    }
    Ok(())
}

fn slide_lines(deck: &Deck) -> Vec<String> {
    deck.slides
        .iter()
        .map(|s| match &s.subtitle {
            Some(sub) => format!("{} ({sub})", s.heading),
            None => s.heading.clone(),
        })
        .collect()
}

fn clip_line(deck: &Deck) -> Option<String> {
    let clip = deck.clip.as_ref()?;
    let window = clip.trim_window();
    Some(format!(
        "Clip: slide {}, plays {:.1}s to {:.1}s of {:.1}s",
        clip.slide,
        window.start,
        window.stop_point(clip.duration),
        clip.duration
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_summary_lines() {
        let yaml = "title: T\nclip:\n  slide: 2\n  duration: 10\n  trim_start: 2\n  trim_end: 1\nslides:\n  - heading: A\n    subtitle: first\n  - heading: B\n";
        let deck = Deck::from_yaml(yaml, PathBuf::new()).unwrap();
        assert_eq!(slide_lines(&deck), vec!["A (first)", "B"]);
        assert_eq!(
            clip_line(&deck).unwrap(),
            "Clip: slide 2, plays 2.0s to 9.0s of 10.0s"
        );
    }

    #[test]
    fn test_missing_deck_is_an_error() {
        let err = run(Path::new("/nonexistent/deck.yaml")).unwrap_err();
        assert!(err.to_string().contains("Deck not found"));
    }
}
