use leptos::*;

use crate::site::Gate;

/// Acknowledgment shown after coming back from the payment page.
#[component]
pub fn ThankYouBanner(gate: RwSignal<Gate>) -> impl IntoView {
    let dismiss = move |_| gate.update(|g| g.dismiss_banner());

    view! {
        <Show when=move || gate.with(|g| g.banner_visible()) fallback=|| ()>
            <div class="thank-you-banner" role="status">
                <span class="banner-icon">"🍺"</span>
                <p>"Cheers for the beer! Your download is starting."</p>
                <button id="thankYouClose" class="banner-close" aria-label="Dismiss" on:click=dismiss>
                    "×"
                </button>
            </div>
        </Show>
    }
}
