use crate::web::route::AppRoute;
use leptos::prelude::*;

/// 订阅、输出、设置等页面的外壳
#[component]
pub fn SectionPage(route: AppRoute, #[prop(into)] description: String) -> impl IntoView {
    view! {
        <div class="p-4 md:p-8 max-w-7xl mx-auto">
            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">{route.title()}</h3>
                    <p class="text-base-content/70">{description}</p>
                </div>
            </div>
        </div>
    }
}
