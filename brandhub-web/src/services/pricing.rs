//! Pricing tiers and checkout links

use brandhub_common::config::BillingConfig;
use brandhub_common::db::Subscription;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingTier {
    pub name: &'static str,
    /// Monthly price in whole US dollars
    pub price_usd: u32,
    pub description: &'static str,
    pub features: Vec<&'static str>,
    /// Hosted checkout link; absent for the free tier or when billing is
    /// not configured
    pub checkout_url: Option<String>,
    pub is_current: bool,
    pub is_featured: bool,
}

/// Tiers as shown on the pricing page for an optional signed-in caller
pub fn pricing_tiers(
    billing: &BillingConfig,
    caller: Option<Uuid>,
    subscription: Option<&Subscription>,
) -> Vec<PricingTier> {
    let active_plan = subscription
        .filter(|s| s.grants_access())
        .and_then(|s| s.plan_id.as_deref());
    let on_plan = |variant: &str| active_plan == Some(variant);

    vec![
        PricingTier {
            name: "Starter",
            price_usd: 0,
            description: "For individuals getting their first brand in order.",
            features: vec!["1 brand", "Asset library", "Brand style guide"],
            checkout_url: None,
            is_current: caller.is_some() && active_plan.is_none(),
            is_featured: false,
        },
        PricingTier {
            name: "Pro",
            price_usd: 39,
            description: "For growing teams running launches.",
            features: vec![
                "Unlimited brands",
                "Launch Calendar",
                "AI Brand Style Checker",
                "Campaign asset grouping",
            ],
            checkout_url: checkout_url(billing, &billing.pro_variant_id, caller),
            is_current: on_plan(&billing.pro_variant_id),
            is_featured: true,
        },
        PricingTier {
            name: "Agency",
            price_usd: 99,
            description: "For agencies managing many client brands.",
            features: vec![
                "Everything in Pro",
                "Client workspaces",
                "Priority support",
            ],
            checkout_url: checkout_url(billing, &billing.agency_variant_id, caller),
            is_current: on_plan(&billing.agency_variant_id),
            is_featured: false,
        },
    ]
}

/// Hosted checkout URL for a variant, tagged with the caller id when known
pub fn checkout_url(billing: &BillingConfig, variant_id: &str, caller: Option<Uuid>) -> Option<String> {
    let store = billing.store_id.as_deref()?;
    let mut url = format!("https://{}.lemonsqueezy.com/buy/{}?embed=1", store, variant_id);
    if let Some(user_id) = caller {
        url.push_str(&format!("&checkout[custom][user_id]={}", user_id));
    }
    Some(url)
}
