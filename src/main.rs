use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use gym_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    entities::UserRole,
    handlers,
    middlewares::{AuthMiddleware, RequireRole, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().map_err(std::io::Error::other)?;

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .map_err(std::io::Error::other)?;

    // 运行数据库迁移
    run_migrations(&pool).await.map_err(std::io::Error::other)?;

    // 创建JWT服务
    let jwt_service = JwtService::new(
        &config.jwt.secret,
        config.jwt.access_token_expires_in,
        config.jwt.refresh_token_expires_in,
    );

    // 创建服务
    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    if let Err(e) = auth_service.ensure_admin(&config.admin).await {
        log::error!("Failed to create bootstrap admin: {}", e);
    }

    let member_service = MemberService::new(pool.clone(), config.membership.clone());
    let course_service = CourseService::new(pool.clone(), config.membership.clone());
    let class_record_service = ClassRecordService::new(pool.clone());
    let coach_service = CoachService::new(pool.clone());
    let finance_service = FinanceService::new(pool.clone());
    let analytics_service = AnalyticsService::new(pool.clone());
    let dashboard_service = DashboardService::new(pool.clone(), finance_service.clone());

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .wrap(create_cors())
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(member_service.clone()))
            .app_data(web::Data::new(course_service.clone()))
            .app_data(web::Data::new(class_record_service.clone()))
            .app_data(web::Data::new(coach_service.clone()))
            .app_data(web::Data::new(finance_service.clone()))
            .app_data(web::Data::new(analytics_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::auth_config)
                    .service(
                        web::scope("/admin")
                            .wrap(RequireRole::new(UserRole::Admin))
                            .configure(handlers::admin_dashboard_config)
                            .configure(handlers::member_config)
                            .configure(handlers::coach_config)
                            .configure(handlers::class_record_config)
                            .configure(handlers::finance_config)
                            .configure(handlers::analytics_config),
                    )
                    .service(
                        web::scope("/member")
                            .wrap(RequireRole::new(UserRole::Member))
                            .configure(handlers::member_dashboard_config),
                    ),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
