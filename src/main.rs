mod app;
mod message;
mod position_poller;
mod progress;
mod state;
mod ui;

use state::App;

fn title(_app: &App) -> String {
    String::from("Video Edit View")
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    iced::application(App::new, App::update, App::view)
        .subscription(App::subscription)
        .title(title)
        .window_size(iced::Size::new(800.0, 240.0))
        .run()
}
