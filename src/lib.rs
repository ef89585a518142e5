pub mod api;
pub mod config;
pub mod engine;
pub mod reporter;
pub mod scraper;
pub mod screener;
pub mod state;
pub mod store;
pub mod types;

/// chain.fm tRPC endpoint listing the wallets of a buy channel (public, no auth required)
pub const CHANNEL_API_URL: &str = "https://chain.fm/api/trpc/walletItem.listBuyChannel";

/// gmgn.ai Next.js data route base. The build id segment follows it.
pub const GMGN_DATA_BASE: &str = "https://gmgn.ai/_next/data";

/// Next.js build id baked into the gmgn.ai data routes.
/// Rotates whenever the site is redeployed, so it is overridable from config.
pub const DEFAULT_GMGN_BUILD_ID: &str = "uFrHZZO4a9NWehviXLbes";

/// Local SOCKS5 proxy the browser is routed through.
pub const DEFAULT_PROXY: &str = "socks5://127.0.0.1:10808";

/// Desktop Chrome user agent presented to gmgn.ai.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
