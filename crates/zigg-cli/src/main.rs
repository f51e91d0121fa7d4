//! ZIGG admin console, command-line edition.
//!
//! Set ZIGG_API_BASE_URL (or API_BASE_URL). `zigg login` stores the session
//! token in ZIGG_SESSION_FILE (default ~/.zigg/token); `zigg logout` or any
//! 401 from the backend removes it.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use zigg_api_client::ApiClient;
use zigg_cli::{alert_message, init_tracing, load_all, load_media, print_json, truncate_string};
use zigg_core::constants::{BANNER_ASPECT, BANNER_MIN_WIDTH, DEFAULT_NOTICE_PRIORITY};
use zigg_core::models::{
    partition_by_status, AdminBoardPost, ApplicantFilter, BoardCategory, Credentials,
    ImagePurpose, MediaKind, NoticeLayout, VideoPurpose,
};
use zigg_core::ConsoleConfig;
use zigg_processing::{
    format_hms, AspectNormalizer, AspectReport, DurationProbe, FfprobeDurationProbe, ImageProbe,
    NormalizeOptions, NormalizePolicy, OutputEncoding,
};
use zigg_services::{
    AuditionForm, FormAssembler, GalleryItem, MediaSlot, NoticeEditForm, NoticeForm,
    PostEditForm, PostForm, UploadCoordinator,
};

#[derive(Parser)]
#[command(name = "zigg", about = "ZIGG admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        #[arg(long, env = "ZIGG_EMAIL")]
        email: String,
        #[arg(long, env = "ZIGG_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Register a new admin account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Forget the stored session token
    Logout,
    /// Audition postings and their applicants
    Audition {
        #[command(subcommand)]
        sub: AuditionCommands,
    },
    /// Admin posts on the community boards
    Board {
        #[command(subcommand)]
        sub: BoardCommands,
    },
    /// Notices and notice banners
    Notice {
        #[command(subcommand)]
        sub: NoticeCommands,
    },
    /// Local media tools and raw uploads
    Media {
        #[command(subcommand)]
        sub: MediaCommands,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AuditionStatus {
    Ongoing,
    Completed,
}

#[derive(Subcommand)]
enum AuditionCommands {
    /// List auditions
    List {
        #[arg(long)]
        status: Option<AuditionStatus>,
    },
    Get {
        id: i64,
    },
    /// Create an audition, uploading its thumbnail first
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        qualification: String,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start: NaiveDate,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: NaiveDate,
        #[arg(long)]
        thumbnail: Option<PathBuf>,
    },
    /// Edit an audition. Omitted fields keep their current value
    Update {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        qualification: Option<String>,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Replacement thumbnail
        #[arg(long)]
        thumbnail: Option<PathBuf>,
    },
    Delete {
        id: i64,
    },
    /// One page of applicants
    Applicants {
        id: i64,
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        page: u32,
        /// all, scrap or like
        #[arg(long, default_value = "all")]
        filter: ApplicantFilter,
    },
    /// Scrap an application (or remove the scrap with --undo)
    Scrap {
        audition_id: i64,
        application_id: i64,
        #[arg(long)]
        undo: bool,
    },
    /// Like an application (or remove the like with --undo)
    Like {
        audition_id: i64,
        application_id: i64,
        #[arg(long)]
        undo: bool,
    },
}

#[derive(Subcommand)]
enum BoardCommands {
    /// List admin posts of a board
    List {
        /// free, promotion or challenge
        #[arg(long, default_value = "free")]
        category: BoardCategory,
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    Get {
        #[arg(long)]
        category: BoardCategory,
        post_id: i64,
    },
    /// Create a post. Images are uploaded in order, then the video
    Create {
        #[arg(long)]
        category: BoardCategory,
        #[arg(long)]
        title: String,
        #[arg(long)]
        message: String,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
        #[arg(long)]
        video: Option<PathBuf>,
    },
    /// Edit a post. Kept images stay first, added images follow
    Update {
        #[arg(long)]
        category: BoardCategory,
        post_id: i64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        message: Option<String>,
        #[arg(long = "add-image")]
        add_images: Vec<PathBuf>,
        /// Image key to drop from the gallery
        #[arg(long = "drop-image")]
        drop_images: Vec<String>,
        #[arg(long, conflicts_with = "remove_video")]
        video: Option<PathBuf>,
        #[arg(long)]
        remove_video: bool,
    },
    Delete {
        #[arg(long)]
        category: BoardCategory,
        post_id: i64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum LayoutArg {
    BannerOnly,
    Common,
}

impl From<LayoutArg> for NoticeLayout {
    fn from(layout: LayoutArg) -> Self {
        match layout {
            LayoutArg::BannerOnly => NoticeLayout::BannerOnly,
            LayoutArg::Common => NoticeLayout::Common,
        }
    }
}

#[derive(Subcommand)]
enum NoticeCommands {
    /// List notice banners
    Banners,
    Get {
        id: i64,
    },
    /// Create a notice. The banner is padded to the banner aspect first
    Create {
        #[arg(long, value_enum, default_value = "common")]
        layout: LayoutArg,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        text: String,
        #[arg(long, default_value_t = DEFAULT_NOTICE_PRIORITY)]
        priority: i32,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        banner: Option<PathBuf>,
        /// Image or video attachment, in order
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },
    /// Edit a notice. Only the given fields are sent
    Update {
        id: i64,
        #[arg(long, value_enum)]
        layout: Option<LayoutArg>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        priority: Option<i32>,
        #[arg(long, conflicts_with = "clear_url")]
        url: Option<String>,
        #[arg(long)]
        clear_url: bool,
        #[arg(long, conflicts_with = "remove_banner")]
        banner: Option<PathBuf>,
        #[arg(long)]
        remove_banner: bool,
    },
    Delete {
        id: i64,
    },
}

#[derive(Subcommand)]
enum MediaCommands {
    /// Print image dimensions or video duration
    Probe { file: PathBuf },
    /// Pad or crop an image to a target aspect and write the result
    Normalize {
        file: PathBuf,
        /// Trim instead of letterboxing
        #[arg(long)]
        crop: bool,
        /// Target width / height
        #[arg(long, default_value_t = BANNER_ASPECT)]
        aspect: f64,
        #[arg(long, default_value_t = BANNER_MIN_WIDTH)]
        min_width: u32,
        /// Encode as PNG instead of JPEG
        #[arg(long)]
        png: bool,
        /// Output directory (defaults to the source directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Upload images one after another; stops at the first failure
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        #[arg(long, default_value = "post-image")]
        purpose: ImagePurpose,
    },
    /// Upload a single video
    UploadVideo {
        file: PathBuf,
        #[arg(long, default_value = "post-video")]
        purpose: VideoPurpose,
    },
}

fn duration_probe(ffprobe_path: String) -> Arc<dyn DurationProbe> {
    Arc::new(FfprobeDurationProbe::new(ffprobe_path))
}

fn assembler(config: &ConsoleConfig) -> anyhow::Result<FormAssembler> {
    let client = ApiClient::from_config(config).context("Failed to create API client")?;
    let uploads = UploadCoordinator::new(client, duration_probe(config.ffprobe_path.clone()));
    Ok(FormAssembler::new(uploads))
}

fn print_post_table(category: BoardCategory, posts: &[AdminBoardPost]) {
    println!("\n=== {:?} board (admin posts) ===\n", category);
    if posts.is_empty() {
        println!("No posts found.");
        return;
    }
    println!(
        "{:<8} {:<30} {:<40} {:>6} {:>8} {:<20}",
        "ID", "Title", "Message", "Likes", "Comments", "Created At"
    );
    println!("{}", "-".repeat(118));
    for post in posts {
        println!(
            "{:<8} {:<30} {:<40} {:>6} {:>8} {:<20}",
            post.post_id,
            truncate_string(&post.post_title, 30),
            truncate_string(&post.post_message.replace('\n', " "), 40),
            post.like_cnt,
            post.comment_cnt,
            truncate_string(&post.created_at, 20)
        );
    }
    println!();
}

/// Print the ratio advisory shown before a banner is normalized.
fn print_banner_advisory(path: &Path, target_aspect: f64) -> anyhow::Result<()> {
    let file = load_media(path)?;
    let dims = ImageProbe::probe(&file)?;
    let report = AspectReport::new(dims.width, dims.height, target_aspect);
    eprintln!("{}", report.message());
    Ok(())
}

async fn run_audition(config: &ConsoleConfig, sub: AuditionCommands) -> anyhow::Result<()> {
    let forms = assembler(config)?;
    let client = forms.uploads().client();

    match sub {
        AuditionCommands::List { status } => {
            let auditions = client.list_auditions().await?;
            let today = Local::now().date_naive();
            match status {
                None => print_json(&auditions)?,
                Some(status) => {
                    let (ongoing, completed) = partition_by_status(auditions, today);
                    match status {
                        AuditionStatus::Ongoing => print_json(&ongoing)?,
                        AuditionStatus::Completed => print_json(&completed)?,
                    }
                }
            }
        }
        AuditionCommands::Get { id } => print_json(&client.get_audition(id).await?)?,
        AuditionCommands::Create {
            title,
            company,
            qualification,
            start,
            end,
            thumbnail,
        } => {
            let form = AuditionForm {
                title,
                company,
                qualification,
                start_date: start,
                end_date: end,
                thumbnail: thumbnail.as_deref().map(load_media).transpose()?,
            };
            print_json(&forms.create_audition(&form).await?)?;
        }
        AuditionCommands::Update {
            id,
            title,
            company,
            qualification,
            start,
            end,
            thumbnail,
        } => {
            let current = client.get_audition(id).await?;
            let start_date = match start {
                Some(day) => day,
                None => current
                    .start_day()
                    .context("Current start date is unreadable; pass --start")?,
            };
            let end_date = match end {
                Some(day) => day,
                None => current
                    .end_day()
                    .context("Current end date is unreadable; pass --end")?,
            };
            let form = AuditionForm {
                title: title.unwrap_or(current.title),
                company: company.unwrap_or(current.company),
                qualification: qualification.unwrap_or(current.qualification),
                start_date,
                end_date,
                thumbnail: thumbnail.as_deref().map(load_media).transpose()?,
            };
            print_json(&forms.update_audition(id, &form).await?)?;
        }
        AuditionCommands::Delete { id } => {
            client.delete_audition(id).await?;
            print_json(&json!({ "success": true, "message": format!("Audition {} deleted", id) }))?;
        }
        AuditionCommands::Applicants { id, page, filter } => {
            let applicants = client.list_applicants(id, page - 1, filter).await?;
            print_json(&applicants)?;
        }
        AuditionCommands::Scrap {
            audition_id,
            application_id,
            undo,
        } => {
            client.set_scrap(audition_id, application_id, !undo).await?;
            print_json(&json!({ "success": true, "scrapped": !undo }))?;
        }
        AuditionCommands::Like {
            audition_id,
            application_id,
            undo,
        } => {
            client.set_like(audition_id, application_id, !undo).await?;
            print_json(&json!({ "success": true, "liked": !undo }))?;
        }
    }
    Ok(())
}

async fn run_board(config: &ConsoleConfig, sub: BoardCommands) -> anyhow::Result<()> {
    let forms = assembler(config)?;
    let client = forms.uploads().client();

    match sub {
        BoardCommands::List { category, json } => {
            let posts = client.list_admin_posts(category).await?;
            if json {
                print_json(&posts)?;
            } else {
                print_post_table(category, &posts);
            }
        }
        BoardCommands::Get { category, post_id } => {
            print_json(&client.get_admin_post(category, post_id).await?)?
        }
        BoardCommands::Create {
            category,
            title,
            message,
            images,
            video,
        } => {
            let form = PostForm {
                title,
                message,
                images: load_all(&images)?,
                video: video.as_deref().map(load_media).transpose()?,
            };
            print_json(&forms.create_post(category, &form).await?)?;
        }
        BoardCommands::Update {
            category,
            post_id,
            title,
            message,
            add_images,
            drop_images,
            video,
            remove_video,
        } => {
            let detail = client.get_admin_post(category, post_id).await?;
            let mut form = PostEditForm::seeded(&detail);
            if let Some(title) = title {
                form.title = title;
            }
            if let Some(message) = message {
                form.message = message;
            }
            form.gallery
                .retain(|item| !matches!(item, GalleryItem::Keep(key) if drop_images.contains(key)));
            form.gallery
                .extend(load_all(&add_images)?.into_iter().map(GalleryItem::Upload));
            form.video = match video {
                Some(path) => MediaSlot::Replace(load_media(&path)?),
                None if remove_video => MediaSlot::Remove,
                None => MediaSlot::Keep,
            };
            print_json(&forms.update_post(category, post_id, &form).await?)?;
        }
        BoardCommands::Delete { category, post_id } => {
            client.delete_post(category, post_id).await?;
            print_json(&json!({ "success": true, "message": format!("Post {} deleted", post_id) }))?;
        }
    }
    Ok(())
}

async fn run_notice(config: &ConsoleConfig, sub: NoticeCommands) -> anyhow::Result<()> {
    let forms = assembler(config)?;
    let client = forms.uploads().client();

    match sub {
        NoticeCommands::Banners => print_json(&client.list_notice_banners().await?)?,
        NoticeCommands::Get { id } => print_json(&client.get_notice(id).await?)?,
        NoticeCommands::Create {
            layout,
            title,
            text,
            priority,
            url,
            banner,
            attachments,
        } => {
            if let Some(path) = &banner {
                print_banner_advisory(path, BANNER_ASPECT)?;
            }
            let form = NoticeForm {
                layout: layout.into(),
                title,
                text_content: text,
                priority,
                on_click_url: url,
                banner: banner.as_deref().map(load_media).transpose()?,
                attachments: load_all(&attachments)?,
            };
            print_json(&forms.create_notice(&form).await?)?;
        }
        NoticeCommands::Update {
            id,
            layout,
            title,
            text,
            priority,
            url,
            clear_url,
            banner,
            remove_banner,
        } => {
            let banner = match banner {
                Some(path) => {
                    print_banner_advisory(&path, BANNER_ASPECT)?;
                    MediaSlot::Replace(load_media(&path)?)
                }
                None if remove_banner => MediaSlot::Remove,
                None => MediaSlot::Keep,
            };
            let on_click_url = match url {
                Some(url) => Some(Some(url)),
                None if clear_url => Some(None),
                None => None,
            };
            let form = NoticeEditForm {
                layout: layout.map(Into::into),
                title,
                text_content: text,
                priority,
                on_click_url,
                banner,
            };
            print_json(&forms.update_notice(id, &form).await?)?;
        }
        NoticeCommands::Delete { id } => {
            client.delete_notice(id).await?;
            print_json(&json!({ "success": true, "message": format!("Notice {} deleted", id) }))?;
        }
    }
    Ok(())
}

async fn run_media(sub: MediaCommands) -> anyhow::Result<()> {
    match sub {
        MediaCommands::Probe { file } => {
            let media = load_media(&file)?;
            if media.declared_kind() == Some(MediaKind::Video) {
                let probe = duration_probe(ConsoleConfig::ffprobe_path_from_env());
                let seconds = probe.probe_duration(&media).await?;
                print_json(&json!({
                    "fileName": media.file_name,
                    "durationSeconds": seconds,
                    "duration": format_hms(seconds),
                }))?;
            } else {
                let dims = ImageProbe::probe(&media)?;
                let report = AspectReport::new(dims.width, dims.height, BANNER_ASPECT);
                print_json(&json!({
                    "fileName": media.file_name,
                    "extension": dims.extension,
                    "width": dims.width,
                    "height": dims.height,
                    "ratio": report.ratio,
                    "matchesBannerAspect": report.matches_target,
                }))?;
            }
        }
        MediaCommands::Normalize {
            file,
            crop,
            aspect,
            min_width,
            png,
            out,
        } => {
            let banner = NormalizeOptions::banner();
            let options = NormalizeOptions {
                target_aspect: aspect,
                min_width,
                policy: if crop { NormalizePolicy::Crop } else { banner.policy },
                encoding: if png { OutputEncoding::Png } else { banner.encoding },
            };
            print_banner_advisory(&file, aspect)?;

            let media = load_media(&file)?;
            let normalized = AspectNormalizer::normalize_blocking(media, options).await?;
            let dir = match out {
                Some(dir) => dir,
                None => file
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from(".")),
            };
            let target = dir.join(&normalized.file.file_name);
            std::fs::write(&target, &normalized.file.data)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            print_json(&json!({
                "file": target.display().to_string(),
                "width": normalized.width,
                "height": normalized.height,
            }))?;
        }
        MediaCommands::Upload { files, purpose } => {
            let config = ConsoleConfig::from_env()?;
            let forms = assembler(&config)?;
            let uploaded = forms
                .uploads()
                .upload_images(&load_all(&files)?, purpose)
                .await?;
            print_json(&uploaded)?;
        }
        MediaCommands::UploadVideo { file, purpose } => {
            let config = ConsoleConfig::from_env()?;
            let forms = assembler(&config)?;
            let uploaded = forms
                .uploads()
                .upload_video(&load_media(&file)?, purpose)
                .await?;
            print_json(&uploaded)?;
        }
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        // local media tools work without any API configuration
        Commands::Media { sub } => run_media(sub).await?,
        Commands::Login { email, password } => {
            let client = ApiClient::from_config(&ConsoleConfig::from_env()?)?;
            client.login(&Credentials { email, password }).await?;
            print_json(&json!({ "success": true, "message": "Logged in" }))?;
        }
        Commands::Register { email, password } => {
            let client = ApiClient::from_config(&ConsoleConfig::from_env()?)?;
            let response = client.register(&Credentials { email, password }).await?;
            print_json(&response)?;
        }
        Commands::Logout => {
            ApiClient::from_config(&ConsoleConfig::from_env()?)?.logout()?;
            print_json(&json!({ "success": true, "message": "Logged out" }))?;
        }
        Commands::Audition { sub } => run_audition(&ConsoleConfig::from_env()?, sub).await?,
        Commands::Board { sub } => run_board(&ConsoleConfig::from_env()?, sub).await?,
        Commands::Notice { sub } => run_notice(&ConsoleConfig::from_env()?, sub).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "Command failed");
            eprintln!("{}", alert_message(&err));
            ExitCode::FAILURE
        }
    }
}
