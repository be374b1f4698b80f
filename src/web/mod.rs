pub mod error;
pub mod feature_toggle;
pub mod fitcheck;

/// Configures the web app by adding services from each web file.
///
/// Expects `web::Data<Gateway>` and `web::Data<AppConfig>` to be registered
/// on the app.
///
/// @see https://docs.rs/actix-web/4.0.1/actix_web/struct.App.html#method.configure
pub fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.app_data(error::json_config());

    // Descending order. Order is important.
    // Route resolution will stop at the first match.
    fitcheck::configure(conf);
    feature_toggle::configure(conf);
}
