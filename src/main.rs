use std::sync::Arc;

use chrono::Utc;
use snooze_alarm::{
    appsettings::AppSettings,
    console::run_commands,
    controller::AlarmController,
    notification::LocalNotificationCenter,
    scheduling::{AlarmNotificationHandler, AlarmScheduler, run_notification_events},
    storage::{FileAlarmStorage, ScheduledAlarmSlot},
};
use tokio::{
    io::{BufReader, stdin, stdout},
    sync::broadcast::error::RecvError,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    pretty_env_logger::init();

    let settings = AppSettings::load()?;
    log::info!(
        "Starting alarm service. [documents_dir = {}]",
        settings.storage.documents_dir.display()
    );

    let storage = FileAlarmStorage::in_directory(&settings.storage.documents_dir);
    let slot = ScheduledAlarmSlot::new(Arc::new(storage));
    let (center, events) = LocalNotificationCenter::new(&settings.notifications);
    let center = Arc::new(center);
    let scheduler = AlarmScheduler::new(center.clone(), slot.clone());

    scheduler.register_categories().await;
    if let Some(alarm) = scheduler.restore(Utc::now()).await {
        log::info!(
            "Restored scheduled alarm. [id = {}, date = {}]",
            alarm.id,
            alarm.date
        );
    }

    let handler = AlarmNotificationHandler::new(scheduler.clone());
    let events_task = tokio::spawn(run_notification_events(events, handler));

    let controller = AlarmController::new(scheduler);
    let mut updates = slot.subscribe();
    log::info!("{}", controller.view_state().await.label);

    let commands = run_commands(BufReader::new(stdin()), stdout(), &controller, &center);
    tokio::pin!(commands);
    let mut commands_open = true;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            result = &mut commands, if commands_open => {
                commands_open = false;
                match result {
                    Ok(()) => log::info!("Standard input closed, commands disabled."),
                    Err(e) => log::error!("Command input failed. [error = {e:#}]"),
                }
            }
            update = updates.recv() => match update {
                Ok(_) | Err(RecvError::Lagged(_)) => {
                    log::info!("{}", controller.view_state().await.label);
                }
                Err(RecvError::Closed) => break,
            }
        }
    }

    log::info!("Shutting down.");
    events_task.abort();
    Ok(())
}
