use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::ArgMatches;
use console::style;
use lexiread_catalog::{
    check_access, format_countdown, label_catalog, time_until_rotation, CatalogEntry,
    DailyPartition, DailyRotation, LibraryFilter, LockState,
};
use lexiread_config::{Config, ConfigManager};
use lexiread_core::{Checkpoint, ContentItem, UserId, Validator};
use lexiread_narration::{
    word_boundaries, EngineEvent, HighlightSink, NarrationCoordinator, NarrationSettings,
    PlayOutcome, SimulatedEngine, SpeechRate, Voice,
};
use lexiread_progress::{FileStore, ProgressTracker};
use lexiread_reader::{FontSize, Page, ReadingSession};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Everything a command needs besides its own arguments
pub struct CliContext {
    manager: ConfigManager,
    config: Config,
    catalog_path: PathBuf,
    today: NaiveDate,
}

impl CliContext {
    pub fn new(
        manager: ConfigManager,
        config: Config,
        catalog_path: PathBuf,
        today: NaiveDate,
    ) -> Self {
        Self {
            manager,
            config,
            catalog_path,
            today,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn catalog(&self) -> Result<Vec<ContentItem>> {
        load_catalog(&self.catalog_path)
    }

    pub fn partition(&self, items: &[ContentItem]) -> DailyPartition {
        DailyRotation::new(&self.config.rotation).partition_items(self.today, items)
    }

    /// User that keys local progress, generated and stored on first use
    pub fn user(&mut self) -> Result<UserId> {
        if let Some(raw) = &self.config.app.user_id {
            return UserId::from_string(raw)
                .with_context(|| format!("Invalid app.user_id '{}' in configuration", raw));
        }

        let user = UserId::new();
        let id = user.as_string();
        self.manager
            .update(|config| config.app.user_id = Some(id.clone()))
            .context("Failed to store the generated user id")?;
        log::info!("Generated user id {}", user);
        self.config.app.user_id = Some(id);
        Ok(user)
    }

    pub fn tracker(&mut self) -> Result<ProgressTracker<FileStore>> {
        let user = self.user()?;
        let store = FileStore::new(self.manager.data_dir(&self.config));
        Ok(ProgressTracker::new(store, user))
    }
}

/// Parses a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", raw))
}

/// Reads the story catalog from a JSON array of stories
///
/// Invalid stories and duplicate ids are rejected; the daily rotation is
/// only stable if every client sees the same pool.
pub fn load_catalog(path: &Path) -> Result<Vec<ContentItem>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    let items: Vec<ContentItem> = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))?;

    let mut seen = HashSet::new();
    for item in &items {
        if let Err(errors) = item.validate() {
            bail!("Story '{}' is invalid: {}", item.id, errors.join("; "));
        }
        if !seen.insert(item.id.clone()) {
            bail!("Story id '{}' appears more than once", item.id);
        }
    }

    log::debug!("Loaded {} stories from {}", items.len(), path.display());
    Ok(items)
}

pub fn find_story<'a>(items: &'a [ContentItem], id: &str) -> Result<&'a ContentItem> {
    items
        .iter()
        .find(|item| item.id.as_str() == id)
        .ok_or_else(|| anyhow!("Story not found: {}", id))
}

#[derive(Debug, Serialize)]
struct DailySummary<'a> {
    #[serde(flatten)]
    partition: &'a DailyPartition,
    next_rotation_in: String,
}

/// Show today's rotation
pub fn show_daily(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let items = ctx.catalog()?;
    let partition = ctx.partition(&items);
    let countdown = format_countdown(time_until_rotation(chrono::Local::now().naive_local()));

    if matches.get_flag("json") {
        let summary = DailySummary {
            partition: &partition,
            next_rotation_in: countdown,
        };
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialize partition")?;
        println!("{}", json);
        return Ok(());
    }

    println!(
        "\n{} free {} stories for {}",
        style(partition.unlocked.len()).bold().cyan(),
        partition.entry_level,
        partition.date
    );
    println!("{}", "=".repeat(80));

    let title_of = |id: &lexiread_core::StoryId| {
        find_story(&items, id.as_str())
            .map(|item| item.title.clone())
            .unwrap_or_default()
    };

    for id in &partition.unlocked {
        println!("  {} {}  {}", style("✓").green().bold(), id, title_of(id));
    }
    if !partition.preview_locked.is_empty() {
        println!("\nComing up (locked today):");
        for id in &partition.preview_locked {
            println!("  {} {}  {}", style("🔒").yellow(), id, title_of(id));
        }
    }
    println!(
        "\n{} more {} stories rest today",
        partition.fully_locked.len(),
        partition.entry_level
    );
    println!("New stories in {}", style(countdown).bold());

    Ok(())
}

pub fn build_filter(matches: &ArgMatches) -> Result<LibraryFilter> {
    let mut filter = LibraryFilter::new();

    if let Some(search) = matches.get_one::<String>("search") {
        filter = filter.with_search(search.as_str());
    }
    if let Some(level) = matches.get_one::<String>("level") {
        filter = filter.with_level(level.parse().map_err(|e: String| anyhow!(e))?);
    }
    if let Some(category) = matches.get_one::<String>("category") {
        filter = filter.with_category(category.as_str());
    }
    if let Some(bucket) = matches.get_one::<String>("read-time") {
        filter = filter.with_read_time(bucket.parse().map_err(|e: String| anyhow!(e))?);
    }
    if let Some(rating) = matches.get_one::<String>("rating") {
        filter = filter.with_min_rating(rating.parse().map_err(|e: String| anyhow!(e))?);
    }

    Ok(filter)
}

/// Labelled, filtered catalog in display order
pub fn visible_entries<'a>(
    items: &'a [ContentItem],
    partition: &DailyPartition,
    subscriber: bool,
    filter: &LibraryFilter,
) -> Vec<CatalogEntry<'a>> {
    let labelled = label_catalog(items, partition, subscriber);
    filter
        .apply(&labelled, |entry| entry.item)
        .into_iter()
        .cloned()
        .collect()
}

/// List the catalog with lock labels
pub fn list_stories(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let filter = build_filter(matches)?;
    let items = ctx.catalog()?;
    let partition = ctx.partition(&items);
    let entries = visible_entries(&items, &partition, ctx.config().app.subscriber, &filter);

    if matches.get_flag("json") {
        let json = serde_json::to_string_pretty(&entries).context("Failed to serialize listing")?;
        println!("{}", json);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No stories match the current filters.");
        return Ok(());
    }

    println!("\n{} Stories", style(entries.len()).bold().cyan());
    println!("{}", "=".repeat(80));
    for entry in &entries {
        print_entry(entry);
    }

    Ok(())
}

fn print_entry(entry: &CatalogEntry<'_>) {
    let item = entry.item;
    let badge = match entry.lock {
        LockState::Unlocked => style("    ").green(),
        LockState::Preview => style("🔒  ").yellow(),
        LockState::Premium => style("★   ").magenta(),
    };

    println!("\n{}{}", badge, style(&item.title).bold());
    let mut details = vec![format!("ID: {}", item.id), item.level.to_string()];
    if let Some(category) = &item.category {
        details.push(category.clone());
    }
    if let Some(minutes) = item.read_time_minutes {
        details.push(format!("{} min", minutes));
    }
    if let Some(rating) = item.rating {
        details.push(format!("{:.1}★", rating));
    }
    println!("    {}", details.join(" | "));
}

/// Options for opening a story
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadRequest {
    /// 1-based page; None resumes from saved progress
    pub page: Option<usize>,
    pub font: Option<u8>,
    /// Page-relative word to mark for the next visit
    pub mark: Option<usize>,
}

/// What the reader sees after opening a story
#[derive(Debug, Clone)]
pub struct ReadView {
    pub title: String,
    pub page_index: usize,
    pub page_count: usize,
    pub page: Page,
    pub highlight: Option<usize>,
    /// How long `highlight` stays before it clears
    pub highlight_for: Option<Duration>,
    pub saved: Checkpoint,
    pub persisted: bool,
}

fn session_for(ctx: &CliContext, item: &ContentItem, font: Option<u8>) -> ReadingSession {
    let mut session = ReadingSession::from_config(item.content.as_str(), &ctx.config().reader);
    if let Some(font) = font {
        session.set_font_size(FontSize::new(font));
    }
    session
}

/// Opens a story after the access check and writes the new checkpoint
pub fn open_story(ctx: &mut CliContext, story: &str, request: ReadRequest) -> Result<ReadView> {
    let items = ctx.catalog()?;
    let item = find_story(&items, story)?;
    let partition = ctx.partition(&items);
    check_access(item, ctx.config().app.subscriber, &partition)
        .into_result(item)
        .with_context(|| format!("Cannot open '{}'", item.title))?;

    let tracker = ctx.tracker()?;
    let mut session = session_for(ctx, item, request.font);

    let mut highlight = None;
    match request.page {
        Some(page) => session.go_to(page.saturating_sub(1)),
        None => {
            if let Some(checkpoint) = tracker.load(&item.id) {
                let target = session.resume(&checkpoint);
                highlight = target.word_index;
                if checkpoint.show_highlight {
                    tracker.clear_highlight_flag(&item.id);
                }
            }
        }
    }

    let saved = match request.mark {
        Some(word) => session.mark_position(word).ok_or_else(|| {
            anyhow!(
                "Page {} has {} words, cannot mark word {}",
                session.current_index() + 1,
                session.current_page().word_count(),
                word
            )
        })?,
        None => session.checkpoint(),
    };
    let persisted = tracker.save(&item.id, &saved);

    Ok(ReadView {
        title: item.title.clone(),
        page_index: session.current_index(),
        page_count: session.page_count(),
        page: session.current_page().clone(),
        highlight,
        highlight_for: highlight.map(|_| session.highlight_duration()),
        saved,
        persisted,
    })
}

/// Open a story and print the current page
pub fn read_story(ctx: &mut CliContext, matches: &ArgMatches) -> Result<()> {
    let story = matches
        .get_one::<String>("story")
        .ok_or_else(|| anyhow!("Story id is required"))?;
    let request = ReadRequest {
        page: matches.get_one::<usize>("page").copied(),
        font: matches.get_one::<u8>("font").copied(),
        mark: matches.get_one::<usize>("mark").copied(),
    };

    let view = open_story(ctx, story, request)?;

    println!("\n{}", style(&view.title).bold().cyan());
    println!(
        "Page {} of {}",
        style(view.page_index + 1).bold(),
        view.page_count
    );
    println!("{}", "=".repeat(80));
    println!("{}", render_page(&view.page, view.highlight));

    if let (Some(word), Some(duration)) = (view.highlight, view.highlight_for) {
        println!(
            "\n{} You left off at \"{}\" (highlighted for {}s)",
            style("→").cyan(),
            view.page.word(word).unwrap_or_default(),
            duration.as_secs()
        );
    }
    if !view.persisted {
        println!("\n{}", style("Reading position could not be saved.").yellow());
    }

    Ok(())
}

/// Page text with paragraph breaks kept and one word optionally highlighted
pub fn render_page(page: &Page, highlight: Option<usize>) -> String {
    let mut index = 0;
    page.paragraphs()
        .map(|paragraph| {
            paragraph
                .split_whitespace()
                .map(|word| {
                    let rendered = if Some(index) == highlight {
                        style(word).reverse().bold().to_string()
                    } else {
                        word.to_string()
                    };
                    index += 1;
                    rendered
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Records highlighted word indices for the console
struct RecordingSink {
    words: usize,
    highlighted: Arc<Mutex<Vec<usize>>>,
}

impl HighlightSink for RecordingSink {
    fn word_count(&self) -> usize {
        self.words
    }

    fn clear(&mut self, _index: usize) {}

    fn highlight(&mut self, index: usize) {
        self.highlighted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(index);
    }
}

/// Voices offered by the console engine
pub fn console_voices() -> Vec<Voice> {
    vec![
        Voice::new("Console Narrator", "en-GB"),
        Voice::new("Console Narrator (US)", "en-US"),
    ]
}

type ConsoleNarration = (Arc<SimulatedEngine>, NarrationCoordinator<SimulatedEngine>);

fn console_coordinator(ctx: &CliContext) -> Result<ConsoleNarration> {
    let engine = Arc::new(SimulatedEngine::new().with_voices(console_voices()));
    let coordinator = NarrationCoordinator::new(
        Arc::clone(&engine),
        NarrationSettings::from(&ctx.config().narration),
    );
    coordinator.load_voices().context("Speech engine unavailable")?;
    Ok((engine, coordinator))
}

/// Result of reading a page aloud
#[derive(Debug, Clone)]
pub struct NarrationReport {
    pub voice: Option<Voice>,
    pub rate: SpeechRate,
    pub page_index: usize,
    pub spoken: Vec<String>,
    pub highlighted: Vec<usize>,
}

/// Options for reading a page aloud
#[derive(Debug, Clone, Copy, Default)]
pub struct NarrateRequest {
    /// 1-based page; None is the first page
    pub page: Option<usize>,
    pub font: Option<u8>,
    pub rate: Option<f32>,
    /// Rate steps applied after `rate`; negative is slower
    pub rate_steps: i32,
}

/// Reads one page aloud, delivering boundary events for every word
pub fn narrate_page(
    ctx: &CliContext,
    story: &str,
    request: NarrateRequest,
) -> Result<NarrationReport> {
    let items = ctx.catalog()?;
    let item = find_story(&items, story)?;
    let partition = ctx.partition(&items);
    check_access(item, ctx.config().app.subscriber, &partition)
        .into_result(item)
        .with_context(|| format!("Cannot narrate '{}'", item.title))?;

    let mut session = session_for(ctx, item, request.font);
    session.go_to(request.page.unwrap_or(1).saturating_sub(1));
    let current = session.current_page().clone();

    let (engine, coordinator) = console_coordinator(ctx)?;
    if let Some(rate) = request.rate {
        coordinator.set_rate(SpeechRate::new(rate)?);
    }
    if request.rate_steps != 0 {
        coordinator.step_rate(request.rate_steps);
    }

    let highlighted = Arc::new(Mutex::new(Vec::new()));
    let sink = RecordingSink {
        words: current.word_count(),
        highlighted: Arc::clone(&highlighted),
    };

    let guard = match coordinator.request_play(current.text(), Some(Box::new(sink)))? {
        PlayOutcome::Started(guard) => guard,
        other => bail!("Narration was already active: {:?}", other),
    };
    let id = guard.id();

    coordinator.handle_event(id, EngineEvent::Started);
    for (char_index, char_length) in word_boundaries(current.text()) {
        coordinator.handle_event(
            id,
            EngineEvent::Boundary {
                char_index,
                char_length,
            },
        );
    }
    if let Some(finished) = engine.finish() {
        coordinator.handle_event(finished, EngineEvent::Ended);
    }
    drop(guard);

    if let Some(error) = coordinator.take_error() {
        return Err(error).with_context(|| format!("Narration of '{}' failed", item.title));
    }

    let highlighted = highlighted.lock().unwrap_or_else(|e| e.into_inner()).clone();
    let spoken = highlighted
        .iter()
        .filter_map(|&index| current.word(index).map(str::to_string))
        .collect();

    Ok(NarrationReport {
        voice: coordinator.best_voice(),
        rate: coordinator.rate(),
        page_index: session.current_index(),
        spoken,
        highlighted,
    })
}

/// Read a page aloud on the console engine
pub fn narrate_story(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let story = matches
        .get_one::<String>("story")
        .ok_or_else(|| anyhow!("Story id is required"))?;

    let faster = i32::from(matches.get_count("faster"));
    let slower = i32::from(matches.get_count("slower"));
    let request = NarrateRequest {
        page: matches.get_one::<usize>("page").copied(),
        font: matches.get_one::<u8>("font").copied(),
        rate: matches.get_one::<f32>("rate").copied(),
        rate_steps: faster - slower,
    };
    let report = narrate_page(ctx, story, request)?;

    println!(
        "\n{} Page {} at {} with {}",
        style("▶").green().bold(),
        report.page_index + 1,
        report.rate,
        report
            .voice
            .as_ref()
            .map_or("the default voice", |v| v.name.as_str())
    );
    println!("{}", "=".repeat(80));
    println!("{}", report.spoken.join(" "));
    println!("\n{} {} words read", style("■").cyan(), report.spoken.len());

    Ok(())
}

/// Speaks one word at the pronunciation rate; returns the rate used
pub fn pronounce_word(ctx: &CliContext, word: &str) -> Result<SpeechRate> {
    let (engine, coordinator) = console_coordinator(ctx)?;
    let guard = coordinator.pronounce(word)?;
    let id = guard.id();

    coordinator.handle_event(id, EngineEvent::Started);
    if let Some(finished) = engine.finish() {
        coordinator.handle_event(finished, EngineEvent::Ended);
    }
    drop(guard);

    if let Some(error) = coordinator.take_error() {
        return Err(error).with_context(|| format!("Cannot pronounce '{}'", word.trim()));
    }

    Ok(coordinator.settings().pronounce_rate)
}

/// Pronounce a single word
pub fn pronounce(ctx: &CliContext, matches: &ArgMatches) -> Result<()> {
    let word = matches
        .get_one::<String>("word")
        .ok_or_else(|| anyhow!("Word is required"))?;

    let rate = pronounce_word(ctx, word)?;
    println!("{} {} at {}", style("🔊").cyan(), style(word.trim()).bold(), rate);
    Ok(())
}

/// Inspect or clear saved progress
pub fn progress_command(ctx: &mut CliContext, matches: &ArgMatches) -> Result<()> {
    let (action, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("A progress subcommand is required"))?;
    let story = sub_matches
        .get_one::<String>("story")
        .ok_or_else(|| anyhow!("Story id is required"))?;

    let items = ctx.catalog()?;
    let item = find_story(&items, story)?;
    let tracker = ctx.tracker()?;

    match action {
        "show" => match tracker.try_load(&item.id).context("Failed to read progress")? {
            Some(checkpoint) => {
                println!("{}", style(&item.title).bold());
                let json = serde_json::to_string_pretty(&checkpoint)
                    .context("Failed to serialize checkpoint")?;
                println!("{}", json);
            }
            None => println!("No saved progress for '{}'", item.title),
        },
        "clear" => {
            if !tracker.clear(&item.id) {
                bail!("Failed to clear progress for '{}'", item.title);
            }
            println!("{} Progress cleared for '{}'", style("✓").green().bold(), item.title);
        }
        other => bail!("Unknown progress subcommand: {}", other),
    }

    Ok(())
}

/// Manage the configuration file
pub fn config_command(
    manager: &ConfigManager,
    effective: &Config,
    matches: &ArgMatches,
) -> Result<()> {
    match matches.subcommand() {
        Some(("init", _)) => {
            if manager.initialize().context("Failed to write default config")? {
                println!(
                    "{} Config written to {}",
                    style("✓").green().bold(),
                    manager.config_path().display()
                );
            } else {
                println!("Config already exists at {}", manager.config_path().display());
            }
        }
        Some(("show", _)) => {
            let rendered =
                toml::to_string_pretty(effective).context("Failed to serialize configuration")?;
            println!("{}", rendered);
        }
        Some(("validate", _)) => {
            let errors = manager.validate().context("Failed to load configuration")?;
            if errors.is_empty() {
                println!("{} Configuration is valid", style("✓").green().bold());
            } else {
                for error in &errors {
                    println!("{} {}", style("✗").red().bold(), error);
                }
                bail!("{} configuration error(s)", errors.len());
            }
        }
        Some(("reset", _)) => {
            manager.reset().context("Failed to reset configuration")?;
            println!("{} Configuration reset to defaults", style("✓").green().bold());
        }
        Some(("path", _)) => println!("{}", manager.config_path().display()),
        _ => bail!("A config subcommand is required"),
    }
    Ok(())
}
