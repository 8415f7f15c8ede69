//! Ticker universe: the single caller-owned symbol list that feeds both the
//! price fetch and the comparison selector.

use std::collections::HashSet;

/// NSE large/mid caps plus the Nifty 50 index, Yahoo Finance symbology.
const DEFAULT_SYMBOLS: &[&str] = &[
    "^NSEI", "SUPREMEIND.NS", "ELECON.NS", "TASTYBITE.NS", "ROTO.NS", "SENCO.NS",
    "GREENPLY.NS", "RADIANTCMS.NS", "OLECTRA.NS", "EXIDEIND.NS", "POWERGRID.NS",
    "TATAELXSI.NS", "SULA.NS", "BSE.NS", "CDSL.NS", "CAMS.NS", "FINEORG.NS", "MANAPPURAM.NS",
    "PRINCEPIPE.NS", "DMART.NS", "BALAMINES.NS", "RADICO.NS", "VBL.NS", "PETRONET.NS",
    "KOTAKBANK.NS", "SYNGENE.NS", "VOLTAS.NS", "PAGEIND.NS", "MGL.NS", "TORNTPHARM.NS",
    "BALRAMCHIN.NS", "MCDOWELL-N.NS", "IGL.NS", "DALBHARAT.NS", "COLPAL.NS", "NAVINFLUOR.NS",
    "IBULHSGFIN.NS", "INDHOTEL.NS", "INDIAMART.NS", "BIOCON.NS", "CROMPTON.NS", "SRF.NS",
    "ZEEL.NS", "JUBLFOOD.NS", "GUJGASLTD.NS", "LALPATHLAB.NS", "PVRINOX.NS", "MFSL.NS",
    "COFORGE.NS", "DIVISLAB.NS", "ABBOTINDIA.NS", "AARTIIND.NS", "DEEPAKNTR.NS", "LUPIN.NS",
    "CONCOR.NS", "TVSMOTOR.NS", "BRITANNIA.NS", "CIPLA.NS", "MARICO.NS", "BHARTIARTL.NS",
    "SUNPHARMA.NS", "GAIL.NS", "PIIND.NS", "CHOLAFIN.NS", "ABB.NS", "GNFC.NS", "ESCORTS.NS",
    "HDFCBANK.NS", "CUMMINSIND.NS", "AUROPHARMA.NS", "METROPOLIS.NS", "BOSCHLTD.NS",
    "TITAN.NS", "IPCALAB.NS", "DELTACORP.NS", "ZYDUSLIFE.NS", "HDFCLIFE.NS", "BALKRISIND.NS",
    "NESTLEIND.NS", "HINDUNILVR.NS", "ATUL.NS", "CHAMBLFERT.NS", "HAL.NS", "BATAINDIA.NS",
    "UBL.NS", "INDIGO.NS", "ITC.NS", "BPCL.NS", "TATACONSUM.NS", "DRREDDY.NS", "DABUR.NS",
    "ULTRACEMCO.NS", "SIEMENS.NS", "ALKEM.NS", "ICICIPRULI.NS", "TRENT.NS", "PIDILITIND.NS",
    "MCX.NS", "TATACOMM.NS", "SBILIFE.NS", "LAURUSLABS.NS", "APOLLOHOSP.NS", "SBICARD.NS",
    "ADANIENT.NS", "RELIANCE.NS", "OBEROIRLTY.NS", "BAJAJFINSV.NS", "VEDL.NS", "OFSS.NS",
    "NAUKRI.NS", "GODREJCP.NS", "ONGC.NS", "MRF.NS", "LICHSGFIN.NS", "GRANULES.NS",
    "AUBANK.NS", "ADANIPORTS.NS", "ICICIGI.NS", "CANFINHOME.NS", "ASIANPAINT.NS", "POLYCAB.NS",
    "BAJFINANCE.NS", "BERGEPAINT.NS", "CUB.NS", "MUTHOOTFIN.NS", "LTTS.NS", "BHARATFORG.NS",
    "UPL.NS", "BAJAJ-AUTO.NS", "TCS.NS", "RBLBANK.NS", "HEROMOTOCO.NS", "BANKBARODA.NS",
    "SUNTV.NS", "GODREJPROP.NS", "SBIN.NS", "M&M.NS", "HAVELLS.NS", "SHREECEM.NS", "IRCTC.NS",
    "SHRIRAMFIN.NS", "TATAMOTORS.NS", "PERSISTENT.NS", "BSOFT.NS", "IOC.NS", "LT.NS",
    "INDUSTOWER.NS", "EICHERMOT.NS", "COALINDIA.NS", "JKCEMENT.NS", "DLF.NS", "RAMCOCEM.NS",
    "HINDPETRO.NS", "ASHOKLEY.NS", "LTIM.NS", "HDFCAMC.NS", "BANDHANBNK.NS", "INFY.NS",
    "BEL.NS", "ABFRL.NS", "M&MFIN.NS", "HCLTECH.NS", "INDIACEM.NS", "TATAPOWER.NS",
    "COROMANDEL.NS", "IDFCFIRSTB.NS", "HINDZINC.NS", "MARUTI.NS", "ICICIBANK.NS", "TECHM.NS",
    "ASTRAL.NS", "IDFC.NS", "AXISBANK.NS", "JSWSTEEL.NS", "FEDERALBNK.NS", "AMBUJACEM.NS",
    "WIPRO.NS", "PEL.NS", "GLENMARK.NS", "APOLLOTYRE.NS", "GRASIM.NS", "CANBK.NS", "RECLTD.NS",
    "HAPPSTMNDS.NS", "CYIENT.NS", "AFFLE.NS", "ZENSARTECH.NS", "MOTHERSUMI.NS",
    "AMARAJABAT.NS", "MOTHERSON.NS",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub symbols: Vec<String>,
}

impl Universe {
    pub fn new(symbols: Vec<String>) -> Self {
        Self { symbols }
    }

    pub fn count(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.iter().any(|s| s == symbol)
    }

    /// Keep only the requested symbols that belong to the universe, in the
    /// order requested.
    pub fn pick<S: AsRef<str>>(&self, requested: &[S]) -> Result<Vec<String>, UniverseError> {
        let mut picked = Vec::with_capacity(requested.len());
        for symbol in requested {
            let symbol = symbol.as_ref().trim().to_uppercase();
            if !self.contains(&symbol) {
                return Err(UniverseError::UnknownSymbol(symbol));
            }
            if !picked.contains(&symbol) {
                picked.push(symbol);
            }
        }
        Ok(picked)
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new(DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in symbol list")]
    EmptyToken,

    #[error("duplicate symbol: {0}")]
    DuplicateSymbol(String),

    #[error("symbol not in universe: {0}")]
    UnknownSymbol(String),

    #[error("symbol list is empty")]
    Empty,
}

pub fn parse_symbols(input: &str) -> Result<Vec<String>, UniverseError> {
    if input.trim().is_empty() {
        return Err(UniverseError::Empty);
    }

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let symbol = trimmed.to_uppercase();
        if !seen.insert(symbol.clone()) {
            return Err(UniverseError::DuplicateSymbol(symbol));
        }
        symbols.push(symbol);
    }

    Ok(symbols)
}
