//! Markdown response formatters for bot commands.
//!
//! This module provides functions to format bot responses in Markdown format
//! for display in Matrix chat rooms.

use chrono::{DateTime, Utc};

use crate::wom::{Player, PlayerAchievement, PlayerGains, PlayerRecord};

/// Maximum number of skills or bosses listed in a gains response.
const MAX_GAINS_LINES: usize = 5;

/// Formats the help message from the usage lines of the registered commands.
///
/// # Examples
///
/// ```
/// # use wombot::commands::markdown_response::format_help;
/// let help = format_help('!', &["help", "player <username>"]);
/// assert!(help.contains("`!player <username>`"));
/// ```
pub fn format_help(prefix: char, usages: &[&str]) -> String {
    let commands = usages
        .iter()
        .map(|usage| format!("- `{}{}`", prefix, usage))
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        "Commands:\n\n{}\n\n\
        Usernames may contain spaces.\n\
        > *wombot* tracks Old School RuneScape players with the Wise Old Man API.",
        commands
    )
}

/// Formats a player summary.
pub fn format_player(player: &Player) -> String {
    let mut lines = vec![
        format!("**{}**", player.display_name),
        format!("- **type**: {} ({})", player.player_type, player.build),
        format!("- **exp**: {}", format_number(player.exp as f64)),
        format!("- **ehp**: {:.2}", player.ehp),
        format!("- **ehb**: {:.2}", player.ehb),
    ];

    if let Some(country) = &player.country {
        lines.push(format!("- **country**: {}", country));
    }

    lines.push(format!("- **registered**: {}", format_date(&player.registered_at)));
    lines.push(match &player.updated_at {
        Some(updated_at) => format!("- **updated**: {}", format_date(updated_at)),
        None => "- **updated**: never".to_owned(),
    });

    lines.join("\n")
}

/// Formats the confirmation of a player update.
pub fn format_player_updated(player: &Player) -> String {
    format!(
        "Updated **{}**: {} exp, {:.2} ehp.",
        player.display_name,
        format_number(player.exp as f64),
        player.ehp
    )
}

/// Formats the gains of a player, listing the largest skill and boss gains.
pub fn format_gains(display_name: &str, period: &str, gains: &PlayerGains) -> String {
    let mut skills: Vec<(&str, f64)> = gains
        .data
        .skills
        .values()
        .filter(|skill| skill.metric != "overall" && skill.experience.gained > 0.0)
        .map(|skill| (skill.metric.as_str(), skill.experience.gained))
        .collect();
    let mut bosses: Vec<(&str, f64)> = gains
        .data
        .bosses
        .values()
        .filter(|boss| boss.kills.gained > 0.0)
        .map(|boss| (boss.metric.as_str(), boss.kills.gained))
        .collect();

    if skills.is_empty() && bosses.is_empty() {
        return format!("**{}** gained nothing this {}.", display_name, period);
    }

    let overall = gains
        .data
        .skills
        .get("overall")
        .map(|skill| skill.experience.gained)
        .unwrap_or(0.0);

    let mut body = format!(
        "**{}** gains this {} ({} - {}): {} exp\n",
        display_name,
        period,
        format_date(&gains.starts_at),
        format_date(&gains.ends_at),
        format_number(overall)
    );

    if !skills.is_empty() {
        body.push_str(&format!("\nSkills:\n{}\n", format_top(&mut skills, "exp")));
    }
    if !bosses.is_empty() {
        body.push_str(&format!("\nBosses:\n{}\n", format_top(&mut bosses, "kills")));
    }

    body.trim_end().to_owned()
}

fn format_top(gains: &mut [(&str, f64)], unit: &str) -> String {
    gains.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(b.0)));

    gains
        .iter()
        .take(MAX_GAINS_LINES)
        .map(|(metric, gained)| format!("- **{}**: +{} {}", metric, format_number(*gained), unit))
        .collect::<Vec<String>>()
        .join("\n")
}

/// Formats one page of records.
///
/// `page` starts at 1.
pub fn format_records_page(
    display_name: &str,
    metric: &str,
    records: &[PlayerRecord],
    page: usize,
    pages: usize,
) -> String {
    let records_md = records
        .iter()
        .map(|record| {
            format!(
                "- **{}**: {} ({})",
                record.period,
                format_number(record.value),
                format_date(&record.updated_at)
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!(
        "**{}** {} records:\n\n{}\n\n*Page {}/{}*",
        display_name, metric, records_md, page, pages
    )
}

/// Formats the most recent achievements of a player.
pub fn format_achievements(display_name: &str, achievements: &[PlayerAchievement]) -> String {
    if achievements.is_empty() {
        return format!("**{}** has no achievements yet.", display_name);
    }

    let achievements_md = achievements
        .iter()
        .map(|achievement| {
            format!(
                "- **{}** ({})",
                achievement.name,
                format_date(&achievement.created_at)
            )
        })
        .collect::<Vec<String>>()
        .join("\n");

    format!("**{}** recent achievements:\n\n{}", display_name, achievements_md)
}

/// Formats the group linked to a room.
pub fn format_group(site_url: &str, group_id: i64) -> String {
    format!(
        "This room follows group **{}** ([details]({}/groups/{})).",
        group_id, site_url, group_id
    )
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Formats a number with thousands separators, dropping the fractional part.
fn format_number(value: f64) -> String {
    let value = value.trunc() as i64;
    let digits = value.unsigned_abs().to_string();

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}
