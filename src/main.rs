//! Wiring & DI. Entry point: load config, bootstrap adapters, inject into services, run UI.
//! No business logic here; the flow lives in ShoppingPlanService.

use clap::Parser;
use dotenv::dotenv;
use meal_planner::adapters::ai::{GeminiAdapter, MockGenerationBackend, OpenAiAdapter};
use meal_planner::adapters::notify::{EmailNotifier, EmailSettings, WhatsAppNotifier};
use meal_planner::adapters::ui::tui::{RunOptions, TuiInputPort};
use meal_planner::ports::{GenerationBackend, InputPort, NotifierPort};
use meal_planner::shared::config::{AppConfig, BackendProvider};
use meal_planner::usecases::{MealRules, PlanGenerator, ShoppingPlanService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Generate a weekly meal plan and shopping list, then send it by email / WhatsApp.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Preferred dishes, allergies or dietary goals. Prompts when omitted.
    #[arg(short, long)]
    preferences: Option<String>,

    /// Print the plan without sending it to any channel.
    #[arg(long)]
    no_deliver: bool,

    /// Use the offline mock backend regardless of configuration.
    #[arg(long)]
    mock: bool,

    /// Print the short chat layout instead of the full report.
    #[arg(long)]
    compact: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    meal_planner::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "config load failed, using defaults");
        AppConfig::default()
    });

    let family_size = cfg.family_size_or_default();
    let backend = build_backend(&cfg, cli.mock);
    let generator = Arc::new(
        PlanGenerator::new(backend, MealRules::for_household(family_size))
            .with_temperature(cfg.temperature_or_default()),
    );
    info!(family_size, "meal plan generator ready");

    let notifiers = if cli.no_deliver {
        Vec::new()
    } else {
        build_notifiers(&cfg, family_size)
    };

    let timeout_secs = cfg.request_timeout_secs_or_default();
    let service = Arc::new(
        ShoppingPlanService::new(generator, notifiers)
            .with_timeout(Duration::from_secs(timeout_secs)),
    );

    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(
        Arc::clone(&service),
        RunOptions {
            preferences: cli.preferences,
            deliver: !cli.no_deliver,
            compact: cli.compact,
        },
    ));

    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}

/// Pick the generation backend. A missing key is not fatal here: the adapter
/// reports `BackendUnavailable` on the call, so the run ends with "no plan".
fn build_backend(cfg: &AppConfig, force_mock: bool) -> Arc<dyn GenerationBackend> {
    let provider = if force_mock {
        BackendProvider::Mock
    } else {
        cfg.provider_or_default()
    };
    if !cfg.is_backend_configured() && provider != BackendProvider::Mock {
        warn!(?provider, "generation backend credential is not set");
    }

    match provider {
        BackendProvider::Gemini => {
            info!(model = %cfg.gemini_model_or_default(), "using Gemini backend");
            Arc::new(GeminiAdapter::new(
                cfg.gemini_api_url_or_default(),
                cfg.gemini_api_key().unwrap_or_default(),
                cfg.gemini_model_or_default(),
            ))
        }
        BackendProvider::OpenAi => {
            info!(
                model = %cfg.ai_model_or_default(),
                url = %cfg.ai_api_url_or_default(),
                "using OpenAI-compatible backend"
            );
            Arc::new(OpenAiAdapter::new(
                cfg.ai_api_url_or_default(),
                cfg.ai_api_key().unwrap_or_default(),
                cfg.ai_model_or_default(),
            ))
        }
        BackendProvider::Mock => {
            warn!("using mock generation backend");
            Arc::new(MockGenerationBackend::new())
        }
    }
}

/// Delivery channels that are fully configured. Incomplete ones are skipped with a warning.
fn build_notifiers(cfg: &AppConfig, family_size: u32) -> Vec<Arc<dyn NotifierPort>> {
    let mut notifiers: Vec<Arc<dyn NotifierPort>> = Vec::new();

    if cfg.is_email_configured() {
        let settings = EmailSettings {
            smtp_server: cfg.smtp_server().unwrap_or_default(),
            smtp_port: cfg.smtp_port_or_default(),
            username: cfg.email_address().unwrap_or_default(),
            password: cfg.email_password().unwrap_or_default(),
            recipient: cfg.recipient_email().unwrap_or_default(),
            household_size: family_size,
        };
        match EmailNotifier::new(&settings) {
            Ok(n) => notifiers.push(Arc::new(n)),
            Err(e) => warn!(error = %e, "email delivery disabled"),
        }
    } else {
        warn!("SMTP credentials or email addresses are missing, email delivery disabled");
    }

    if cfg.is_whatsapp_configured() {
        info!("WhatsApp delivery enabled (Twilio)");
        notifiers.push(Arc::new(WhatsAppNotifier::new(
            cfg.twilio_account_sid().unwrap_or_default(),
            cfg.twilio_auth_token().unwrap_or_default(),
            cfg.whatsapp_sender_number().unwrap_or_default(),
            cfg.whatsapp_recipient().unwrap_or_default(),
        )));
    } else {
        warn!("Twilio credentials or phone numbers are missing, WhatsApp delivery disabled");
    }

    notifiers
}
