use log::debug;
use std::fmt::Write as _;
use std::io;
use std::time::Instant;
use tokio::io::{ AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt };

use crate::history::{ format_timestamp, ConversationHistory };
use crate::rate_limit::UsageStats;
use crate::session::Session;

const HELP: &str = "\
Commands:
  /history [page]         show past conversations, newest first
  /search <term> [page]   show conversations containing <term>
  /clear                  clear the conversation history
  /stats                  show API usage for this session
  /help                   show this message
  /quit                   leave
Anything else is sent to Grok as a query.
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Query(String),
    History { page: usize },
    Search { term: String, page: usize },
    Clear,
    Stats,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Query(trimmed.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or("").to_lowercase();
    let args: Vec<&str> = parts.collect();

    match name.as_str() {
        "history" | "h" =>
            match args.as_slice() {
                [] => Command::History { page: 1 },
                [page] =>
                    match page.parse() {
                        Ok(page) => Command::History { page },
                        Err(_) => Command::Unknown(format!("'{}' is not a page number", page)),
                    }
                _ => Command::Unknown("usage: /history [page]".to_string()),
            }
        "search" | "s" => {
            let (words, page) = match args.split_last() {
                Some((last, words)) if !words.is_empty() =>
                    match last.parse::<usize>() {
                        Ok(page) => (words.to_vec(), page),
                        Err(_) => (args.clone(), 1),
                    }
                _ => (args.clone(), 1),
            };
            if words.is_empty() {
                Command::Unknown("usage: /search <term> [page]".to_string())
            } else {
                Command::Search { term: words.join(" "), page }
            }
        }
        "clear" => Command::Clear,
        "stats" => Command::Stats,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => Command::Unknown(format!("unknown command '/{}'. Type /help", other)),
    }
}

pub fn render_history(
    history: &ConversationHistory,
    filter: Option<&str>,
    page: usize,
    page_size: usize
) -> String {
    if history.is_empty() {
        return "No conversation history yet. Start chatting with Grok!\n".to_string();
    }

    let view = history.page(filter, page, page_size);
    let mut out = String::new();
    if view.total_matches == 0 {
        let _ = writeln!(out, "No conversations found containing '{}'", filter.unwrap_or(""));
        return out;
    }

    let _ = writeln!(out, "### Conversation History");
    let _ = writeln!(out, "Total conversations: {}", history.len());
    if let Some(term) = filter {
        let _ = writeln!(out, "Matching '{}': {}", term, view.total_matches);
    }
    let _ = writeln!(out, "Page {}/{}", view.page, view.total_pages);
    for (number, entry) in &view.entries {
        let _ = writeln!(
            out,
            "\n--- Conversation {} - {} ---",
            number,
            format_timestamp(&entry.timestamp())
        );
        let _ = writeln!(out, "You: {}", entry.query());
        let _ = writeln!(out, "Grok: {}", entry.response());
    }
    if view.page < view.total_pages {
        let _ = writeln!(out, "\n(more: page {} of {})", view.page + 1, view.total_pages);
    }
    out
}

pub fn render_stats(stats: &UsageStats) -> String {
    format!(
        "### API Usage Stats\nRequests this minute: {}/{}\nRequests this hour: {}/{}\n",
        stats.requests_this_minute,
        stats.minute_limit,
        stats.requests_this_hour,
        stats.hour_limit
    )
}

/// Reads lines until EOF or `/quit`; each query is awaited before the next line is read.
pub async fn run<R, W>(
    session: &mut Session,
    page_size: usize,
    reader: R,
    mut out: W
) -> io::Result<()>
    where R: AsyncBufRead + Unpin, W: AsyncWrite + Unpin
{
    let mut lines = reader.lines();
    out.write_all(
        format!(
            "Grok Query Interface ({} via {})\nType /help for commands. History lives only in this session.\n",
            session.client().get_model(),
            session.client().get_base_url()
        ).as_bytes()
    ).await?;

    loop {
        out.write_all(b"\n> ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        let reply = match parse_command(&line) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help => HELP.to_string(),
            Command::Unknown(msg) => format!("{}\n", msg),
            Command::Clear => {
                session.clear_history();
                "Conversation history cleared.\n".to_string()
            }
            Command::Stats => render_stats(&session.usage(Instant::now())),
            Command::History { page } => render_history(session.history(), None, page, page_size),
            Command::Search { term, page } =>
                render_history(session.history(), Some(term.as_str()), page, page_size),
            Command::Query(query) => {
                debug!("Submitting query from terminal");
                match session.submit(&query, Instant::now()).await {
                    Ok(entry) => format!("Grok:\n{}\n", entry.response()),
                    Err(e) => format!("Error: {}\n", e.user_message()),
                }
            }
        };
        out.write_all(reply.as_bytes()).await?;
    }

    out.write_all(b"\nGoodbye.\n").await?;
    out.flush().await
}
