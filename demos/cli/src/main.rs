use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use procare_core::{
    markup, CardView, DisplayLocale, DisplayZone, HostSnapshot, TimelineCard, EMPTY_MESSAGE,
};
use serde_json::{Map, Value};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "procare-cli",
    about = "Render card timeline Procare từ ảnh chụp trạng thái host."
)]
struct Args {
    /// File JSON trạng thái host (`{"states": {...}}` hoặc bảng entity).
    #[arg(short, long)]
    states: PathBuf,

    /// File JSON cấu hình card.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ghi đè `entity` trong cấu hình.
    #[arg(short, long)]
    entity: Option<String>,

    /// Locale hiển thị, ví dụ `de-DE`. Mặc định lấy từ trạng thái host.
    #[arg(short, long)]
    locale: Option<String>,

    /// Múi giờ IANA của người xem, ví dụ `America/New_York`. Mặc định lấy
    /// từ trạng thái host, không có thì giữ offset của timestamp.
    #[arg(short, long)]
    time_zone: Option<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Html,
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("procare_core=info".parse()?)
                .add_directive("procare_cli=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    tracing::info!(states = ?args.states, format = ?args.format, "render card");

    let snapshot = HostSnapshot::from_json_str(&read_file(&args.states)?)?;

    let mut config = match &args.config {
        Some(path) => serde_json::from_str::<Value>(&read_file(path)?)
            .with_context(|| format!("Cấu hình không hợp lệ: {path:?}"))?,
        None => Value::Object(Map::new()),
    };
    if let Some(entity) = &args.entity {
        config
            .as_object_mut()
            .context("Cấu hình phải là object JSON")?
            .insert("entity".to_string(), Value::from(entity.clone()));
    }

    let locale = args
        .locale
        .as_deref()
        .map(DisplayLocale::from_tag)
        .unwrap_or_else(|| snapshot.display_locale());

    let zone = match args.time_zone.as_deref() {
        Some(name) => DisplayZone::from_name(name)
            .with_context(|| format!("Múi giờ không hợp lệ: {name}"))?,
        None => snapshot.display_zone(None),
    };

    let mut card = TimelineCard::from_config(&config)?
        .with_locale(locale)
        .with_zone(zone);
    let Some(view) = card.update(&snapshot.states) else {
        bail!("Card chưa được cấu hình");
    };

    let output = match args.format {
        OutputFormat::Html => markup::render_html(view),
        OutputFormat::Text => render_text(view),
        OutputFormat::Json => serde_json::to_string_pretty(view)?,
    };
    println!("{output}");

    Ok(())
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Không đọc được file {path:?}"))
}

fn render_text(view: &CardView) -> String {
    let mut lines = vec![view.header().to_string()];

    match view {
        CardView::Error { message } => lines.push(message.clone()),
        CardView::Empty { .. } => lines.push(EMPTY_MESSAGE.to_string()),
        CardView::Timeline { items, .. } => {
            for item in items {
                lines.push(format!("[{}] {}  {}", item.icon, item.time, item.title));
                if !item.description.is_empty() {
                    lines.push(format!("    {}", item.description));
                }
                if let Some(staff) = item.staff_line() {
                    lines.push(format!("    {staff}"));
                }
                if let Some(url) = &item.photo_url {
                    lines.push(format!("    {url}"));
                }
            }
        }
    }

    lines.join("\n")
}
