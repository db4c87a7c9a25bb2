use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};

use aula_server::{
    app_state::AppState,
    auth::{AuthMiddleware, JwtService},
    config::Config,
    handlers::{
        certificate_handler, course_handler, enrollment_handler, health_handler,
        submission_handler,
    },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    if std::env::var("APP_ENV").as_deref() == Ok("production") {
        config.validate_for_production();
    }

    let jwt_service = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

    let bind_addr = (config.web_server_host.clone(), config.web_server_port);
    let state = AppState::new(config)
        .await
        .unwrap_or_else(|e| panic!("Failed to initialize application state: {}", e));

    log::info!("Starting HTTP server on {}:{}", bind_addr.0, bind_addr.1);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(jwt_service.clone()))
            .wrap(Logger::default())
            .wrap(cors)
            .service(health_handler::health)
            .service(certificate_handler::verify_certificate)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware)
                    .service(course_handler::create_course)
                    .service(course_handler::list_my_courses)
                    .service(course_handler::get_course)
                    .service(course_handler::update_course)
                    .service(course_handler::delete_course)
                    .service(course_handler::add_lecture)
                    .service(course_handler::create_assignment)
                    .service(course_handler::get_assignment)
                    .service(course_handler::update_assignment)
                    .service(course_handler::delete_assignment)
                    .service(enrollment_handler::enroll)
                    .service(enrollment_handler::unenroll)
                    .service(enrollment_handler::complete_lecture)
                    .service(enrollment_handler::get_progress)
                    .service(submission_handler::submit_assignment)
                    .service(submission_handler::get_submission)
                    .service(submission_handler::review_submission)
                    .service(submission_handler::list_submissions)
                    .service(submission_handler::grade_submission)
                    .service(submission_handler::delete_submission),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
