use mixpanel_track::{ConfigOverrides, Mixpanel};
use serde_json::json;

#[cfg(feature = "tracing")]
fn init_tracing() {
    use tracing_subscriber::FmtSubscriber;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");
}

#[tokio::main]
async fn main() {
    #[cfg(feature = "tracing")]
    init_tracing();

    let mixpanel = Mixpanel::init("YOUR_PROJECT_TOKEN", None).expect("token must not be empty");

    mixpanel.set_config(ConfigOverrides {
        debug: Some(true),
        ..Default::default()
    });

    let _ = mixpanel
        .track(
            "signup",
            Some(json!({
                "distinct_id": "user-42",
                "button": "signup",
            })),
        )
        .await;

    let _ = mixpanel
        .track_funnel("onboarding", 2, "checkout", Some(json!({ "distinct_id": "user-42" })))
        .await;

    let _ = mixpanel
        .email(
            "welcome-campaign",
            "user-42",
            "Welcome aboard!",
            Some(json!({
                "properties": { "variant": "a" },
            })),
        )
        .await;
}
