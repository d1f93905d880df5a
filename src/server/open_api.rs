use crate::database::models;
use crate::modules::{audit, auth, common, dealership, lead, vehicle};
use crate::server::controller;
use axum::Router;
use utoipa::openapi::InfoBuilder;
use utoipa::{openapi::OpenApiBuilder, OpenApi};
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(
        common::responses::SimpleError,
        models::Dealership,
        models::Vehicle,
        models::Inquiry,
        models::FinancingApplication,
        models::AuditLog,
        auth::dto::Login,
        auth::dto::LoginResponse,
        auth::dto::SuccessResponse,
        auth::dto::AuthCheck,
        auth::dto::SelectDealership,
        vehicle::dto::SortBy,
        vehicle::dto::ListVehiclesResponse,
        vehicle::dto::CreateVehicle,
        vehicle::dto::UpdateVehicle,
        dealership::dto::UpdateDealership,
        lead::dto::CreateInquiry,
        lead::dto::CreateFinancingApplication,
    )),
    paths(
        controller::healthcheck,
        auth::routes::login,
        auth::routes::logout,
        auth::routes::check,
        auth::routes::select_dealership,
        vehicle::routes::list_vehicles,
        vehicle::routes::featured_vehicles,
        vehicle::routes::get_vehicle,
        vehicle::routes::create_vehicle,
        vehicle::routes::update_vehicle,
        vehicle::routes::delete_vehicle,
        audit::routes::list_audit_logs,
        lead::routes::create_inquiry,
        lead::routes::create_financing_application,
        dealership::routes::get_dealership,
        dealership::routes::update_dealership,
    )
)]
struct ApiDoc;

pub fn create_openapi_router() -> Router<controller::AppState> {
    let builder: OpenApiBuilder = ApiDoc::openapi().into();

    let info = InfoBuilder::new()
        .title("Autolot API")
        .description(Some(
            "Multi tenant dealership storefront and admin dashboard api.",
        ))
        .version("0.1.0")
        .build();

    let api_doc = builder.info(info).build();

    Router::new()
        .merge(SwaggerUi::new("/swagger").url("/docs/swagger.json", api_doc.clone()))
        .merge(RapiDoc::with_openapi("/docs/openapi.json", api_doc).path("/rapidoc"))
}
