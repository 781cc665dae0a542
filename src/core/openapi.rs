use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::identification::{
    dtos as identification_dtos, handlers as identification_handlers,
};
use crate::features::images::{dtos as images_dtos, handlers as images_handlers};
use crate::features::subscribers::{dtos as subscribers_dtos, handlers as subscribers_handlers};
use crate::features::system::{dtos as system_dtos, handlers as system_handlers};
use crate::shared::types::MessageResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        // System
        system_handlers::root,
        system_handlers::health,
        system_handlers::frontend_config,
        system_handlers::api_keys,
        // Identification
        identification_handlers::identify_plant,
        // Images (public)
        images_handlers::upload_image,
        images_handlers::list_images,
        images_handlers::map_images,
        images_handlers::news_images,
        images_handlers::list_plants,
        // Images (moderation)
        images_handlers::delete_image,
        images_handlers::change_state,
        images_handlers::edit_image,
        // Subscribers
        subscribers_handlers::subscribe,
        subscribers_handlers::list_subscribers,
        subscribers_handlers::delete_subscriber,
        subscribers_handlers::delete_subscriber_by_email,
        // Auth
        auth_handlers::login,
        auth_handlers::verify_token,
        auth_handlers::change_password,
    ),
    components(
        schemas(
            // Shared
            MessageResponse,
            // System
            system_dtos::RootResponseDto,
            system_dtos::HealthResponseDto,
            system_dtos::ServicesStatusDto,
            system_dtos::FrontendConfigDto,
            // Identification
            identification_dtos::IdentifyPlantDto,
            identification_dtos::IdentifyResponseDto,
            // Images
            images_dtos::UploadImageDto,
            images_dtos::UploadImageResponseDto,
            images_dtos::DeleteImageResponseDto,
            images_dtos::ChangeStateResponseDto,
            images_dtos::EditImageResponseDto,
            images_dtos::ImageListResponseDto,
            images_dtos::PlantListResponseDto,
            // Subscribers
            subscribers_dtos::SubscribeFormDto,
            subscribers_dtos::SubscribeResponseDto,
            subscribers_dtos::SubscriberSummaryDto,
            subscribers_dtos::SubscriberListResponseDto,
            // Auth
            auth_dtos::LoginFormDto,
            auth_dtos::LoginResponseDto,
            auth_dtos::VerifyTokenResponseDto,
            auth_dtos::ChangePasswordFormDto,
        )
    ),
    tags(
        (name = "system", description = "Service status and public frontend settings"),
        (name = "identification", description = "Plant identification through PlantNet"),
        (name = "images", description = "Plant image upload, moderation and galleries"),
        (name = "subscribers", description = "Notification subscriptions"),
        (name = "auth", description = "Administrator authentication"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Cuenca Ubaté API",
        version = "0.1.0",
        description = "Backend for the Cuenca Ubaté plant gallery",
    )
)]
pub struct ApiDoc;

/// Adds the bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
