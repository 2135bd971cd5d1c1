pub mod config;
pub mod config_loader;
pub mod events;
pub mod instrument;
pub mod moves;
pub mod signal;
pub mod traits;

pub use config::{
    EngineConfig, FillConfig, GateConfig, RiskConfig, SessionConfig, UniverseConfig,
};
pub use config_loader::ConfigLoader;
pub use events::{MarketSnapshot, OptionQuote};
pub use instrument::{occ_symbol, CandidateContract, OptionType, TradeableInstrument};
pub use signal::{SignalAction, SignalOutput};
pub use traits::{DecisionSignal, MarketDataProvider, QuoteSource};
