use actix_web::web;

use crate::handlers;

pub fn scoped_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(web::resource("/login").route(web::post().to(handlers::auth::login)))
            .service(web::resource("/register").route(web::post().to(handlers::auth::register)))
            .service(web::resource("/logout").route(web::post().to(handlers::auth::logout))),
    )
    .service(
        web::scope("/posts")
            .service(web::resource("").route(web::get().to(handlers::posts::list_published)))
            .service(web::resource("/{slug}").route(web::get().to(handlers::posts::get_by_slug))),
    )
    .service(
        web::scope("/donations")
            .service(
                web::resource("/categories")
                    .route(web::get().to(handlers::donations::list_active_categories)),
            )
            .service(web::resource("/pay").route(web::post().to(handlers::payments::pay))),
    )
    .service(
        web::scope("/settings")
            .service(
                web::resource("/contact").route(web::get().to(handlers::settings::contact_info)),
            )
            .service(
                web::resource("/volunteer-form")
                    .route(web::get().to(handlers::volunteer::form_config)),
            ),
    )
    .service(
        web::resource("/bank-accounts").route(web::get().to(handlers::bank_accounts::list_public)),
    )
    .service(web::resource("/volunteer").route(web::post().to(handlers::volunteer::submit)))
    .service(web::resource("/contact").route(web::post().to(handlers::contact::submit)))
    .service(
        web::scope("/admin")
            .service(
                web::scope("/posts")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::posts::admin_list))
                            .route(web::post().to(handlers::posts::admin_create)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(handlers::posts::admin_update))
                            .route(web::delete().to(handlers::posts::admin_delete)),
                    ),
            )
            .service(
                web::scope("/donations")
                    .service(
                        web::resource("/categories")
                            .route(web::get().to(handlers::donations::admin_list_categories))
                            .route(web::post().to(handlers::donations::admin_create_category)),
                    )
                    .service(
                        web::resource("/categories/{id}")
                            .route(web::put().to(handlers::donations::admin_update_category))
                            .route(web::delete().to(handlers::donations::admin_delete_category)),
                    )
                    .service(
                        web::resource("/transactions")
                            .route(web::get().to(handlers::payments::admin_transactions)),
                    ),
            )
            .service(
                web::scope("/bank-accounts")
                    .service(
                        web::resource("")
                            .route(web::get().to(handlers::bank_accounts::admin_list))
                            .route(web::post().to(handlers::bank_accounts::admin_create)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::put().to(handlers::bank_accounts::admin_update))
                            .route(web::delete().to(handlers::bank_accounts::admin_delete)),
                    ),
            )
            .service(
                web::scope("/volunteer")
                    .service(
                        web::resource("").route(web::get().to(handlers::volunteer::admin_list)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(handlers::volunteer::admin_get))
                            .route(web::patch().to(handlers::volunteer::admin_update_status)),
                    ),
            )
            .service(
                web::resource("/settings")
                    .route(web::get().to(handlers::settings::admin_get))
                    .route(web::put().to(handlers::settings::admin_update)),
            ),
    );
}
