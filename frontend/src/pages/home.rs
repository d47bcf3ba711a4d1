use yew::prelude::*;
use yew_router::prelude::*;
use yew_hooks::prelude::*;
use crate::Route;
use crate::components::wizard_page::WizardPage;
use crate::wizard::product::{self, ALL_PRODUCTS};

#[function_component]
pub fn Home() -> Html {
    html! {
        <div style="max-width: 960px; margin: 6rem auto 2rem; padding: 0 1rem;">
            <style>
            {r#".product-grid {
                display: grid;
                grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
                gap: 1.5rem;
            }
            .product-card {
                display: block;
                padding: 2rem;
                background: rgba(30, 30, 30, 0.7);
                border: 1px solid rgba(30, 144, 255, 0.1);
                border-radius: 16px;
                color: #fff;
                text-decoration: none;
                transition: border-color 0.2s ease;
            }
            .product-card:hover { border-color: rgba(30, 144, 255, 0.5); }
            .product-card p { color: rgba(255, 255, 255, 0.7); }"#}
            </style>
            <h1 style="text-align: center; color: #fff;">{"Made just for you"}</h1>
            <div class="product-grid">
                { for ALL_PRODUCTS.iter().map(|p| html! {
                    <Link<Route> to={Route::Create { product: p.slug.to_string() }} classes="product-card">
                        <h2>{ p.title }</h2>
                        <p>{ p.tagline }</p>
                    </Link<Route>>
                }) }
            </div>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct ProductPageProps {
    pub slug: String,
}

/// Wizard for one product. An access token from checkout arrives as `?token=`.
#[function_component]
pub fn ProductPage(props: &ProductPageProps) -> Html {
    let token = use_search_param("token".to_string());

    match product::by_slug(&props.slug) {
        Some(config) => html! {
            <WizardPage key={config.slug} product={config} token={token} />
        },
        None => html! { <NotFound /> },
    }
}

#[function_component]
pub fn NotFound() -> Html {
    html! {
        <div style="margin: 8rem auto; text-align: center; color: #fff;">
            <h1>{"Page not found"}</h1>
            <Link<Route> to={Route::Home} classes="nav-link">{"Back to the shop"}</Link<Route>>
        </div>
    }
}
