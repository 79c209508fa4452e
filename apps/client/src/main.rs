use std::process::ExitCode;

use anyhow::{anyhow, bail, Result};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use amae_clinic_client::AppContext;
use auth_cell::LoginAudience;
use shared_config::ClientConfig;
use shared_models::{ClientError, Role};

const USAGE: &str = "usage: amae-clinic-client <command>

commands:
  login <email> <password> [--doctor|--patient]
  whoami
  logout
  refresh
  profile
  activation-status
  appointments
  doctors";

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<ClientError>() {
                Some(client_error) => eprintln!("{}", client_error.user_message()),
                None => eprintln!("{}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Vec<String>) -> Result<()> {
    let Some((command, rest)) = args.split_first() else {
        bail!(USAGE);
    };

    let ctx = AppContext::new(ClientConfig::from_env())?;

    match command.as_str() {
        "login" => login(&ctx, rest).await,
        "whoami" => whoami(&ctx),
        "logout" => {
            ctx.auth().logout().await?;
            println!("Logged out");
            Ok(())
        }
        "refresh" => {
            let session = ctx.auth().refresh_tokens().await?;
            println!("Tokens refreshed for {}", session.email);
            Ok(())
        }
        "profile" => profile(&ctx).await,
        "activation-status" => {
            let status = ctx.doctors().activation_status().await?;
            println!("activated: {}", status.is_activated);
            if !status.message.is_empty() {
                println!("{}", status.message);
            }
            Ok(())
        }
        "appointments" => {
            for appointment in ctx.appointments().list_appointments().await? {
                println!(
                    "{}  {}  {}  {}",
                    appointment.appointment_date_time,
                    appointment.status,
                    appointment.doctor_name.as_deref().unwrap_or(appointment.doctor_id.as_str()),
                    appointment.reason.as_deref().unwrap_or_default()
                );
            }
            Ok(())
        }
        "doctors" => {
            for doctor in ctx.appointments().available_doctors().await? {
                println!(
                    "{}  {}  {}",
                    doctor.id,
                    doctor.full_name(),
                    doctor.specialization.as_deref().unwrap_or_default()
                );
            }
            Ok(())
        }
        other => Err(anyhow!("unknown command '{}'\n\n{}", other, USAGE)),
    }
}

async fn login(ctx: &AppContext, args: &[String]) -> Result<()> {
    let mut positional = Vec::new();
    let mut audience = None;

    for arg in args {
        match arg.as_str() {
            "--doctor" => audience = Some(LoginAudience::Doctor),
            "--patient" => audience = Some(LoginAudience::Patient),
            flag if flag.starts_with("--") => bail!("unknown flag '{}'", flag),
            value => positional.push(value),
        }
    }

    let [email, password] = positional.as_slice() else {
        bail!("usage: amae-clinic-client login <email> <password> [--doctor|--patient]");
    };

    let session = ctx.auth().login(email, password, audience).await?;
    info!("Session saved to {}", ctx.sessions().path().display());
    println!("Logged in as {} ({})", session.display_name, session.role);
    Ok(())
}

fn whoami(ctx: &AppContext) -> Result<()> {
    let session = ctx
        .sessions()
        .current_session()
        .ok_or(ClientError::NotAuthenticated)?;

    println!("{} <{}>", session.display_name, session.email);
    println!("role: {}", session.role);
    println!("user id: {}", session.user_id);
    Ok(())
}

async fn profile(ctx: &AppContext) -> Result<()> {
    match ctx.sessions().current_role() {
        None => Err(ClientError::NotAuthenticated.into()),
        Some(Role::Doctor) => {
            let doctor = ctx.doctors().get_profile().await?;
            println!("{} <{}>", doctor.display_name(), doctor.email);
            if let Some(specialization) = &doctor.specialization {
                println!("specialization: {}", specialization);
            }
            println!("activated: {}", doctor.is_activated);
            Ok(())
        }
        Some(_) => {
            let profile = ctx.patients().get_profile().await?;
            println!("{} <{}>", profile.full_name(), profile.email);
            if let Some(phone) = &profile.phone_number {
                println!("phone: {}", phone);
            }
            Ok(())
        }
    }
}
