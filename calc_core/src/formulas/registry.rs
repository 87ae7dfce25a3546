//! # Formula Registry
//!
//! Central registry of the closed-form formulas behind every calculator.
//! Each formula has metadata: a plain-text rendering, variable definitions,
//! a reference and the function that implements it.
//!
//! ## Usage
//!
//! ```rust
//! use calc_core::formulas::registry::{Formula, FormulaCategory};
//!
//! let meta = Formula::Haversine.metadata();
//! assert_eq!(meta.category, FormulaCategory::Geometry);
//! println!("{} = {}", meta.name, meta.formula_plain);
//! ```

use serde::{Deserialize, Serialize};

// ============================================================================
// Categories
// ============================================================================

/// Calculator family a formula belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormulaCategory {
    Geometry,
    Finance,
    Biometrics,
    Statistics,
    Algebra,
    Travel,
}

impl FormulaCategory {
    pub const ALL: [FormulaCategory; 6] = [
        FormulaCategory::Geometry,
        FormulaCategory::Finance,
        FormulaCategory::Biometrics,
        FormulaCategory::Statistics,
        FormulaCategory::Algebra,
        FormulaCategory::Travel,
    ];

    /// Display name for the category
    pub fn display_name(&self) -> &'static str {
        match self {
            FormulaCategory::Geometry => "Geometry",
            FormulaCategory::Finance => "Finance",
            FormulaCategory::Biometrics => "Biometrics",
            FormulaCategory::Statistics => "Statistics",
            FormulaCategory::Algebra => "Algebra",
            FormulaCategory::Travel => "Travel",
        }
    }

    /// Parse from a lowercase or display name
    pub fn from_str_flexible(s: &str) -> Option<Self> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.display_name().to_lowercase() == needle)
    }
}

// ============================================================================
// Variable Definition
// ============================================================================

/// Definition of a variable used in a formula.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Symbol (e.g., "r", "N_0")
    pub symbol: &'static str,
    pub description: &'static str,
    /// Units, or "-" for dimensionless
    pub units: &'static str,
}

impl Variable {
    pub const fn new(symbol: &'static str, description: &'static str, units: &'static str) -> Self {
        Self { symbol, description, units }
    }
}

// ============================================================================
// Formula Metadata
// ============================================================================

/// Complete metadata for one formula.
#[derive(Debug, Clone)]
pub struct FormulaMetadata {
    /// Human-readable name (e.g., "Haversine Distance")
    pub name: &'static str,
    pub description: &'static str,
    /// The formula in plain text (what results show to users)
    pub formula_plain: &'static str,
    /// Textbook or standard the formula comes from
    pub reference: &'static str,
    pub variables: Vec<Variable>,
    pub category: FormulaCategory,
    /// Source module where the formula is implemented
    pub source_module: &'static str,
    pub source_function: &'static str,
}

// ============================================================================
// Formula Enum
// ============================================================================

/// Every formula used by the calculators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Formula {
    // Geometry: distance
    EuclideanDistance,
    ManhattanDistance,
    Haversine,
    InitialBearing,
    // Geometry: solids
    CubeMeasures,
    RectangularPrismMeasures,
    SphereMeasures,
    CylinderMeasures,
    ConeMeasures,
    PyramidMeasures,
    TubeMeasures,
    MassFromDensity,
    // Geometry: plane figures
    RectangleArea,
    TriangleArea,
    HeronArea,
    CircleArea,
    EllipseArea,
    TrapezoidArea,
    ParallelogramArea,
    SectorArea,
    // Geometry: slope
    Slope,
    SlopeAngle,
    PercentGrade,
    // Finance
    BondPrice,
    AccruedInterest,
    MacaulayDuration,
    ModifiedDuration,
    Convexity,
    CurrentYield,
    Cagr,
    ArithmeticMean,
    StandardDeviation,
    SharpeRatio,
    MaxDrawdown,
    ProgressiveTax,
    SocialSecurityTax,
    MedicareTax,
    GrossUp,
    InflationFutureCost,
    InflationPurchasingPower,
    FisherRealReturn,
    // Biometrics
    MifflinStJeor,
    HarrisBenedict,
    TotalDailyEnergy,
    MacroGrams,
    BodyMassIndex,
    // Statistics
    ProportionSampleSize,
    FinitePopulationCorrection,
    PowerOneSampleMean,
    PowerTwoSampleMeans,
    PowerTwoProportions,
    ExponentialDecay,
    DecayConstants,
    // Algebra
    LinearInequality,
    QuadraticFormula,
    AbsoluteValueInequality,
    // Travel
    FuelEconomy,
    FuelCost,
}

impl Formula {
    /// Get the full metadata for this formula
    pub fn metadata(&self) -> FormulaMetadata {
        use FormulaCategory::*;
        match self {
            // ----------------------------------------------------------------
            // Distance
            // ----------------------------------------------------------------
            Formula::EuclideanDistance => FormulaMetadata {
                name: "Euclidean Distance",
                description: "Straight-line distance between two points in the plane or in space",
                formula_plain: "d = sqrt((x2-x1)^2 + (y2-y1)^2 [+ (z2-z1)^2])",
                reference: "Pythagorean theorem",
                variables: vec![
                    Variable::new("d", "Distance", "length"),
                    Variable::new("x, y, z", "Point coordinates", "length"),
                ],
                category: Geometry,
                source_module: "geometry/distance.rs",
                source_function: "calculate",
            },
            Formula::ManhattanDistance => FormulaMetadata {
                name: "Manhattan Distance",
                description: "Sum of absolute coordinate differences (taxicab metric)",
                formula_plain: "d = |x2-x1| + |y2-y1| [+ |z2-z1|]",
                reference: "L1 norm",
                variables: vec![Variable::new("d", "Distance", "length")],
                category: Geometry,
                source_module: "geometry/distance.rs",
                source_function: "calculate",
            },
            Formula::Haversine => FormulaMetadata {
                name: "Haversine Distance",
                description: "Great-circle distance between two latitude/longitude points on a sphere",
                formula_plain: "a = sin^2(dphi/2) + cos(phi1)*cos(phi2)*sin^2(dlambda/2); d = 2R*atan2(sqrt(a), sqrt(1-a))",
                reference: "Sinnott, Virtues of the Haversine (1984)",
                variables: vec![
                    Variable::new("phi", "Latitude", "rad"),
                    Variable::new("lambda", "Longitude", "rad"),
                    Variable::new("R", "Earth radius (6371 km or 3958.8 mi)", "km | mi"),
                ],
                category: Geometry,
                source_module: "geometry/distance.rs",
                source_function: "haversine",
            },
            Formula::InitialBearing => FormulaMetadata {
                name: "Initial Bearing",
                description: "Forward azimuth from the first point toward the second along the great circle",
                formula_plain: "theta = atan2(sin(dlambda)*cos(phi2), cos(phi1)*sin(phi2) - sin(phi1)*cos(phi2)*cos(dlambda))",
                reference: "Spherical trigonometry",
                variables: vec![Variable::new("theta", "Bearing, clockwise from north", "deg")],
                category: Geometry,
                source_module: "geometry/distance.rs",
                source_function: "initial_bearing",
            },

            // ----------------------------------------------------------------
            // Solids
            // ----------------------------------------------------------------
            Formula::CubeMeasures => FormulaMetadata {
                name: "Cube",
                description: "Surface area and volume of a cube",
                formula_plain: "SA = 6a^2, V = a^3",
                reference: "Euclidean solid geometry",
                variables: vec![Variable::new("a", "Edge length", "length")],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "measure",
            },
            Formula::RectangularPrismMeasures => FormulaMetadata {
                name: "Rectangular Prism",
                description: "Surface area and volume of a rectangular box",
                formula_plain: "SA = 2(lw + lh + wh), V = lwh",
                reference: "Euclidean solid geometry",
                variables: vec![
                    Variable::new("l", "Length", "length"),
                    Variable::new("w", "Width", "length"),
                    Variable::new("h", "Height", "length"),
                ],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "measure",
            },
            Formula::SphereMeasures => FormulaMetadata {
                name: "Sphere",
                description: "Surface area and volume of a sphere",
                formula_plain: "SA = 4*pi*r^2, V = (4/3)*pi*r^3",
                reference: "Archimedes, On the Sphere and Cylinder",
                variables: vec![Variable::new("r", "Radius", "length")],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "measure",
            },
            Formula::CylinderMeasures => FormulaMetadata {
                name: "Cylinder",
                description: "Surface area and volume of a right circular cylinder",
                formula_plain: "SA = 2*pi*r*(r + h), V = pi*r^2*h",
                reference: "Euclidean solid geometry",
                variables: vec![
                    Variable::new("r", "Radius", "length"),
                    Variable::new("h", "Height", "length"),
                ],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "measure",
            },
            Formula::ConeMeasures => FormulaMetadata {
                name: "Cone",
                description: "Surface area and volume of a right circular cone",
                formula_plain: "s = sqrt(r^2 + h^2), SA = pi*r*(r + s), V = pi*r^2*h/3",
                reference: "Euclidean solid geometry",
                variables: vec![
                    Variable::new("r", "Base radius", "length"),
                    Variable::new("h", "Height", "length"),
                    Variable::new("s", "Slant height", "length"),
                ],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "measure",
            },
            Formula::PyramidMeasures => FormulaMetadata {
                name: "Rectangular Pyramid",
                description: "Surface area and volume of a right pyramid with a rectangular base",
                formula_plain: "SA = lw + l*sqrt(h^2 + (w/2)^2) + w*sqrt(h^2 + (l/2)^2), V = lwh/3",
                reference: "Euclidean solid geometry",
                variables: vec![
                    Variable::new("l", "Base length", "length"),
                    Variable::new("w", "Base width", "length"),
                    Variable::new("h", "Apex height", "length"),
                ],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "measure",
            },
            Formula::TubeMeasures => FormulaMetadata {
                name: "Hollow Tube",
                description: "Surface area (outer, inner and both annular ends) and material volume of a tube",
                formula_plain: "SA = 2*pi*L*(R + r) + 2*pi*(R^2 - r^2), V = pi*(R^2 - r^2)*L",
                reference: "Euclidean solid geometry",
                variables: vec![
                    Variable::new("R", "Outer radius", "length"),
                    Variable::new("r", "Inner radius", "length"),
                    Variable::new("L", "Length", "length"),
                ],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "measure",
            },
            Formula::MassFromDensity => FormulaMetadata {
                name: "Mass from Density",
                description: "Mass of a solid from its volume and material density",
                formula_plain: "m = rho * V",
                reference: "Definition of density",
                variables: vec![
                    Variable::new("rho", "Density", "kg/m^3"),
                    Variable::new("V", "Volume", "m^3"),
                ],
                category: Geometry,
                source_module: "geometry/solids.rs",
                source_function: "calculate",
            },

            // ----------------------------------------------------------------
            // Plane figures
            // ----------------------------------------------------------------
            Formula::RectangleArea => FormulaMetadata {
                name: "Rectangle Area",
                description: "Area and perimeter of a rectangle (or square)",
                formula_plain: "A = l*w, P = 2(l + w)",
                reference: "Euclidean plane geometry",
                variables: vec![
                    Variable::new("l", "Length", "length"),
                    Variable::new("w", "Width", "length"),
                ],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },
            Formula::TriangleArea => FormulaMetadata {
                name: "Triangle Area",
                description: "Area of a triangle from base and perpendicular height",
                formula_plain: "A = b*h/2",
                reference: "Euclidean plane geometry",
                variables: vec![
                    Variable::new("b", "Base", "length"),
                    Variable::new("h", "Height", "length"),
                ],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },
            Formula::HeronArea => FormulaMetadata {
                name: "Heron's Formula",
                description: "Area of a triangle from its three side lengths",
                formula_plain: "s = (a + b + c)/2, A = sqrt(s(s-a)(s-b)(s-c))",
                reference: "Heron of Alexandria, Metrica",
                variables: vec![
                    Variable::new("a, b, c", "Side lengths", "length"),
                    Variable::new("s", "Semi-perimeter", "length"),
                ],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },
            Formula::CircleArea => FormulaMetadata {
                name: "Circle Area",
                description: "Area and circumference of a circle",
                formula_plain: "A = pi*r^2, C = 2*pi*r",
                reference: "Euclidean plane geometry",
                variables: vec![Variable::new("r", "Radius", "length")],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },
            Formula::EllipseArea => FormulaMetadata {
                name: "Ellipse Area",
                description: "Area of an ellipse with Ramanujan's perimeter approximation",
                formula_plain: "A = pi*a*b, P ~ pi*(3(a+b) - sqrt((3a+b)(a+3b)))",
                reference: "Ramanujan (1914)",
                variables: vec![
                    Variable::new("a", "Semi-major axis", "length"),
                    Variable::new("b", "Semi-minor axis", "length"),
                ],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },
            Formula::TrapezoidArea => FormulaMetadata {
                name: "Trapezoid Area",
                description: "Area of a trapezoid from its parallel sides and height",
                formula_plain: "A = (a + b)*h/2",
                reference: "Euclidean plane geometry",
                variables: vec![
                    Variable::new("a, b", "Parallel sides", "length"),
                    Variable::new("h", "Height", "length"),
                ],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },
            Formula::ParallelogramArea => FormulaMetadata {
                name: "Parallelogram Area",
                description: "Area and perimeter of a parallelogram",
                formula_plain: "A = b*h, P = 2(b + s)",
                reference: "Euclidean plane geometry",
                variables: vec![
                    Variable::new("b", "Base", "length"),
                    Variable::new("s", "Slanted side", "length"),
                    Variable::new("h", "Height", "length"),
                ],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },
            Formula::SectorArea => FormulaMetadata {
                name: "Circular Sector Area",
                description: "Area and perimeter of a circular sector",
                formula_plain: "A = (theta/360)*pi*r^2, P = 2r + (theta/360)*2*pi*r",
                reference: "Euclidean plane geometry",
                variables: vec![
                    Variable::new("r", "Radius", "length"),
                    Variable::new("theta", "Central angle", "deg"),
                ],
                category: Geometry,
                source_module: "geometry/area.rs",
                source_function: "measure",
            },

            // ----------------------------------------------------------------
            // Slope
            // ----------------------------------------------------------------
            Formula::Slope => FormulaMetadata {
                name: "Slope",
                description: "Rise over run between two points",
                formula_plain: "m = (y2 - y1) / (x2 - x1)",
                reference: "Analytic geometry",
                variables: vec![Variable::new("m", "Slope", "-")],
                category: Geometry,
                source_module: "geometry/slope.rs",
                source_function: "calculate",
            },
            Formula::SlopeAngle => FormulaMetadata {
                name: "Angle of Inclination",
                description: "Angle between the line and the positive x axis",
                formula_plain: "theta = atan(m)",
                reference: "Analytic geometry",
                variables: vec![Variable::new("theta", "Angle", "deg")],
                category: Geometry,
                source_module: "geometry/slope.rs",
                source_function: "calculate",
            },
            Formula::PercentGrade => FormulaMetadata {
                name: "Percent Grade",
                description: "Steepness expressed as a percentage",
                formula_plain: "grade = |m| * 100",
                reference: "Surveying practice",
                variables: vec![Variable::new("grade", "Percent grade", "%")],
                category: Geometry,
                source_module: "geometry/slope.rs",
                source_function: "calculate",
            },

            // ----------------------------------------------------------------
            // Finance
            // ----------------------------------------------------------------
            Formula::BondPrice => FormulaMetadata {
                name: "Bond Price",
                description: "Present value of coupons and principal discounted at the per-period yield",
                formula_plain: "P = sum(C / (1+y)^t_k) + F / (1+y)^t_n, t_k = k - f",
                reference: "Fabozzi, Bond Markets, Analysis and Strategies",
                variables: vec![
                    Variable::new("C", "Coupon per period", "currency"),
                    Variable::new("F", "Face value", "currency"),
                    Variable::new("y", "Yield per period", "-"),
                    Variable::new("f", "Elapsed fraction of current coupon period", "-"),
                ],
                category: Finance,
                source_module: "finance/bond.rs",
                source_function: "calculate",
            },
            Formula::AccruedInterest => FormulaMetadata {
                name: "Accrued Interest",
                description: "Coupon earned since the last payment; separates dirty and clean price",
                formula_plain: "AI = C * f, clean = dirty - AI",
                reference: "Fabozzi, Bond Markets, Analysis and Strategies",
                variables: vec![Variable::new("AI", "Accrued interest", "currency")],
                category: Finance,
                source_module: "finance/bond.rs",
                source_function: "calculate",
            },
            Formula::MacaulayDuration => FormulaMetadata {
                name: "Macaulay Duration",
                description: "Present-value weighted average time to the bond's cash flows",
                formula_plain: "D_mac = sum(t_k * PV_k) / P / m",
                reference: "Macaulay (1938)",
                variables: vec![
                    Variable::new("PV_k", "Present value of cash flow k", "currency"),
                    Variable::new("m", "Payments per year", "1/yr"),
                ],
                category: Finance,
                source_module: "finance/bond.rs",
                source_function: "calculate",
            },
            Formula::ModifiedDuration => FormulaMetadata {
                name: "Modified Duration",
                description: "Approximate percentage price change for a 1.00 change in yield",
                formula_plain: "D_mod = D_mac / (1 + y)",
                reference: "Hicks (1939)",
                variables: vec![Variable::new("y", "Yield per period", "-")],
                category: Finance,
                source_module: "finance/bond.rs",
                source_function: "calculate",
            },
            Formula::Convexity => FormulaMetadata {
                name: "Convexity",
                description: "Second-order correction to the duration price approximation",
                formula_plain: "CX = sum(CF_k * t_k * (t_k+1) / (1+y)^(t_k+2)) / P / m^2",
                reference: "Fabozzi, Bond Markets, Analysis and Strategies",
                variables: vec![Variable::new("CF_k", "Cash flow k", "currency")],
                category: Finance,
                source_module: "finance/bond.rs",
                source_function: "calculate",
            },
            Formula::CurrentYield => FormulaMetadata {
                name: "Current Yield",
                description: "Annual coupon income relative to clean price",
                formula_plain: "CY = annual coupon / clean price",
                reference: "Fabozzi, Bond Markets, Analysis and Strategies",
                variables: vec![],
                category: Finance,
                source_module: "finance/bond.rs",
                source_function: "calculate",
            },
            Formula::Cagr => FormulaMetadata {
                name: "Compound Annual Growth Rate",
                description: "Constant annual rate that grows the start value into the end value",
                formula_plain: "CAGR = (end / start)^(1 / years) - 1",
                reference: "Standard compounding identity",
                variables: vec![
                    Variable::new("start", "Beginning value", "currency"),
                    Variable::new("end", "Ending value", "currency"),
                    Variable::new("years", "Holding period", "yr"),
                ],
                category: Finance,
                source_module: "finance/returns.rs",
                source_function: "calculate_cagr",
            },
            Formula::ArithmeticMean => FormulaMetadata {
                name: "Arithmetic Mean Return",
                description: "Simple average of period returns",
                formula_plain: "mean = sum(r_i) / n",
                reference: "Descriptive statistics",
                variables: vec![Variable::new("r_i", "Return of period i", "%")],
                category: Finance,
                source_module: "finance/returns.rs",
                source_function: "calculate",
            },
            Formula::StandardDeviation => FormulaMetadata {
                name: "Standard Deviation",
                description: "Dispersion of period returns (population: n, sample: n - 1)",
                formula_plain: "sigma = sqrt(sum((r_i - mean)^2) / (n or n-1))",
                reference: "Descriptive statistics",
                variables: vec![Variable::new("sigma", "Volatility per period", "%")],
                category: Finance,
                source_module: "finance/returns.rs",
                source_function: "calculate",
            },
            Formula::SharpeRatio => FormulaMetadata {
                name: "Sharpe Ratio",
                description: "Excess return per unit of volatility",
                formula_plain: "S = (mean - rf) / sigma",
                reference: "Sharpe (1966)",
                variables: vec![Variable::new("rf", "Risk-free return per period", "%")],
                category: Finance,
                source_module: "finance/returns.rs",
                source_function: "calculate",
            },
            Formula::MaxDrawdown => FormulaMetadata {
                name: "Maximum Drawdown",
                description: "Largest peak-to-trough decline of the cumulative value series",
                formula_plain: "MDD = max((peak_t - V_t) / peak_t)",
                reference: "Magdon-Ismail & Atiya (2004)",
                variables: vec![Variable::new("V_t", "Cumulative value at period t", "-")],
                category: Finance,
                source_module: "finance/returns.rs",
                source_function: "max_drawdown",
            },
            Formula::ProgressiveTax => FormulaMetadata {
                name: "Progressive Bracket Tax",
                description: "Each slice of taxable income taxed at its own bracket's marginal rate",
                formula_plain: "T = sum(rate_i * (min(income, upper_i) - lower_i)) over brackets with income > lower_i",
                reference: "IRS Rev. Proc. 2023-34",
                variables: vec![Variable::new("rate_i", "Marginal rate of bracket i", "%")],
                category: Finance,
                source_module: "finance/tax.rs",
                source_function: "bracket_tax",
            },
            Formula::SocialSecurityTax => FormulaMetadata {
                name: "Social Security Tax",
                description: "Flat employee rate applied up to the annual wage base",
                formula_plain: "SS = 6.2% * min(wages, wage_base)",
                reference: "SSA 2024 contribution and benefit base",
                variables: vec![Variable::new("wage_base", "Annual wage cap", "USD")],
                category: Finance,
                source_module: "finance/tax.rs",
                source_function: "fica",
            },
            Formula::MedicareTax => FormulaMetadata {
                name: "Medicare Tax",
                description: "Flat rate on all wages plus an additional surtax above the filing threshold",
                formula_plain: "MED = 1.45% * wages + 0.9% * max(0, wages - threshold)",
                reference: "IRC 3101(b)",
                variables: vec![Variable::new("threshold", "Additional Medicare threshold", "USD")],
                category: Finance,
                source_module: "finance/tax.rs",
                source_function: "fica",
            },
            Formula::GrossUp => FormulaMetadata {
                name: "Gross-Up",
                description: "Pre-tax amount required to net a target after a flat rate",
                formula_plain: "gross = net / (1 - rate)",
                reference: "Payroll practice",
                variables: vec![Variable::new("rate", "Combined tax rate", "-")],
                category: Finance,
                source_module: "finance/tax.rs",
                source_function: "gross_up",
            },
            Formula::InflationFutureCost => FormulaMetadata {
                name: "Inflation-Adjusted Future Cost",
                description: "Nominal price after compounding inflation",
                formula_plain: "FV = amount * (1 + i)^years",
                reference: "Standard compounding identity",
                variables: vec![Variable::new("i", "Annual inflation rate", "-")],
                category: Finance,
                source_module: "finance/inflation.rs",
                source_function: "calculate",
            },
            Formula::InflationPurchasingPower => FormulaMetadata {
                name: "Purchasing Power",
                description: "Today's-money value of a future nominal amount",
                formula_plain: "PV = amount / (1 + i)^years",
                reference: "Standard compounding identity",
                variables: vec![Variable::new("i", "Annual inflation rate", "-")],
                category: Finance,
                source_module: "finance/inflation.rs",
                source_function: "calculate",
            },
            Formula::FisherRealReturn => FormulaMetadata {
                name: "Fisher Real Return",
                description: "Inflation-adjusted rate of return",
                formula_plain: "real = (1 + nominal) / (1 + inflation) - 1",
                reference: "Fisher (1930)",
                variables: vec![],
                category: Finance,
                source_module: "finance/inflation.rs",
                source_function: "real_return_pct",
            },

            // ----------------------------------------------------------------
            // Biometrics
            // ----------------------------------------------------------------
            Formula::MifflinStJeor => FormulaMetadata {
                name: "Mifflin-St Jeor BMR",
                description: "Resting energy expenditure from weight, height, age and sex",
                formula_plain: "BMR = 10w + 6.25h - 5a + s (s = +5 male, -161 female)",
                reference: "Mifflin et al., Am J Clin Nutr (1990)",
                variables: vec![
                    Variable::new("w", "Weight", "kg"),
                    Variable::new("h", "Height", "cm"),
                    Variable::new("a", "Age", "yr"),
                ],
                category: Biometrics,
                source_module: "biometrics/energy.rs",
                source_function: "basal_metabolic_rate",
            },
            Formula::HarrisBenedict => FormulaMetadata {
                name: "Harris-Benedict BMR (revised)",
                description: "Roza & Shizgal revision of the Harris-Benedict equation",
                formula_plain: "male: 88.362 + 13.397w + 4.799h - 5.677a; female: 447.593 + 9.247w + 3.098h - 4.330a",
                reference: "Roza & Shizgal, Am J Clin Nutr (1984)",
                variables: vec![
                    Variable::new("w", "Weight", "kg"),
                    Variable::new("h", "Height", "cm"),
                    Variable::new("a", "Age", "yr"),
                ],
                category: Biometrics,
                source_module: "biometrics/energy.rs",
                source_function: "basal_metabolic_rate",
            },
            Formula::TotalDailyEnergy => FormulaMetadata {
                name: "Total Daily Energy Expenditure",
                description: "BMR scaled by an activity multiplier, then shifted by the goal delta",
                formula_plain: "TDEE = BMR * activity; target = TDEE + goal delta",
                reference: "FAO/WHO/UNU energy requirements",
                variables: vec![Variable::new("activity", "Activity multiplier", "-")],
                category: Biometrics,
                source_module: "biometrics/energy.rs",
                source_function: "calculate",
            },
            Formula::MacroGrams => FormulaMetadata {
                name: "Macronutrient Grams",
                description: "Calorie share converted to grams",
                formula_plain: "protein g = kcal*p/4, carbs g = kcal*c/4, fat g = kcal*f/9",
                reference: "Atwater factors",
                variables: vec![Variable::new("p, c, f", "Calorie share of each macronutrient", "-")],
                category: Biometrics,
                source_module: "biometrics/energy.rs",
                source_function: "macro_breakdown",
            },
            Formula::BodyMassIndex => FormulaMetadata {
                name: "Body Mass Index",
                description: "Weight relative to height squared",
                formula_plain: "BMI = w / (h/100)^2",
                reference: "WHO BMI classification",
                variables: vec![
                    Variable::new("w", "Weight", "kg"),
                    Variable::new("h", "Height", "cm"),
                ],
                category: Biometrics,
                source_module: "biometrics/energy.rs",
                source_function: "body_mass_index",
            },

            // ----------------------------------------------------------------
            // Statistics
            // ----------------------------------------------------------------
            Formula::ProportionSampleSize => FormulaMetadata {
                name: "Sample Size for a Proportion",
                description: "Respondents required to estimate a proportion within a margin of error",
                formula_plain: "n = Z^2 * p * (1 - p) / E^2",
                reference: "Cochran, Sampling Techniques (1977)",
                variables: vec![
                    Variable::new("Z", "Critical value", "-"),
                    Variable::new("p", "Expected proportion", "-"),
                    Variable::new("E", "Margin of error", "-"),
                ],
                category: Statistics,
                source_module: "statistics/sample_size.rs",
                source_function: "calculate",
            },
            Formula::FinitePopulationCorrection => FormulaMetadata {
                name: "Finite Population Correction",
                description: "Shrinks the required sample when it is a sizeable fraction of the population",
                formula_plain: "n_adj = n / (1 + (n - 1) / N)",
                reference: "Cochran, Sampling Techniques (1977)",
                variables: vec![Variable::new("N", "Population size", "-")],
                category: Statistics,
                source_module: "statistics/sample_size.rs",
                source_function: "calculate",
            },
            Formula::PowerOneSampleMean => FormulaMetadata {
                name: "One-Sample Mean Power",
                description: "Sample size to detect a standardized effect against a fixed mean",
                formula_plain: "n = ((z_alpha + z_beta) / d)^2",
                reference: "Cohen, Statistical Power Analysis (1988)",
                variables: vec![Variable::new("d", "Cohen's d", "-")],
                category: Statistics,
                source_module: "statistics/power.rs",
                source_function: "calculate",
            },
            Formula::PowerTwoSampleMeans => FormulaMetadata {
                name: "Two-Sample Means Power",
                description: "Per-group sample size to detect a standardized difference of means",
                formula_plain: "n = 2 * ((z_alpha + z_beta) / d)^2",
                reference: "Cohen, Statistical Power Analysis (1988)",
                variables: vec![Variable::new("d", "Cohen's d", "-")],
                category: Statistics,
                source_module: "statistics/power.rs",
                source_function: "calculate",
            },
            Formula::PowerTwoProportions => FormulaMetadata {
                name: "Two-Proportion Power",
                description: "Per-group sample size to detect a difference between two proportions",
                formula_plain: "n = (z_alpha*sqrt(2*pbar*qbar) + z_beta*sqrt(p1*q1 + p2*q2))^2 / (p1 - p2)^2",
                reference: "Fleiss, Statistical Methods for Rates and Proportions",
                variables: vec![Variable::new("pbar", "Pooled proportion (p1 + p2)/2", "-")],
                category: Statistics,
                source_module: "statistics/power.rs",
                source_function: "calculate",
            },
            Formula::ExponentialDecay => FormulaMetadata {
                name: "Half-Life Decay",
                description: "Quantity remaining after elapsed time given the half-life",
                formula_plain: "N_t = N_0 * 0.5^(t / t_half)",
                reference: "Rutherford & Soddy (1903)",
                variables: vec![
                    Variable::new("N_0", "Initial quantity", "any"),
                    Variable::new("N_t", "Remaining quantity", "any"),
                    Variable::new("t", "Elapsed time", "time"),
                    Variable::new("t_half", "Half-life", "time"),
                ],
                category: Statistics,
                source_module: "statistics/half_life.rs",
                source_function: "calculate",
            },
            Formula::DecayConstants => FormulaMetadata {
                name: "Decay Constant Relations",
                description: "Conversions between half-life, mean lifetime and decay constant",
                formula_plain: "t_half = tau * ln2 = ln2 / lambda",
                reference: "Radioactive decay law",
                variables: vec![
                    Variable::new("tau", "Mean lifetime", "time"),
                    Variable::new("lambda", "Decay constant", "1/time"),
                ],
                category: Statistics,
                source_module: "statistics/half_life.rs",
                source_function: "convert_constants",
            },

            // ----------------------------------------------------------------
            // Algebra
            // ----------------------------------------------------------------
            Formula::LinearInequality => FormulaMetadata {
                name: "Linear Inequality",
                description: "Isolate x; dividing by a negative coefficient reverses the comparison",
                formula_plain: "ax + b < c  =>  x < (c - b)/a if a > 0, x > (c - b)/a if a < 0",
                reference: "Elementary algebra",
                variables: vec![],
                category: Algebra,
                source_module: "algebra/inequality.rs",
                source_function: "solve_linear",
            },
            Formula::QuadraticFormula => FormulaMetadata {
                name: "Quadratic Formula",
                description: "Roots of ax^2 + bx + c; the discriminant decides their nature",
                formula_plain: "D = b^2 - 4ac, x = (-b +/- sqrt(D)) / 2a",
                reference: "Elementary algebra",
                variables: vec![Variable::new("D", "Discriminant", "-")],
                category: Algebra,
                source_module: "algebra/quadratic.rs",
                source_function: "solve_quadratic",
            },
            Formula::AbsoluteValueInequality => FormulaMetadata {
                name: "Absolute Value Inequality",
                description: "Rewrite |ax + b| against c as a bounded interval or a two-interval union",
                formula_plain: "|u| < c  <=>  -c < u < c; |u| > c  <=>  u < -c or u > c",
                reference: "Elementary algebra",
                variables: vec![],
                category: Algebra,
                source_module: "algebra/inequality.rs",
                source_function: "solve_absolute",
            },

            // ----------------------------------------------------------------
            // Travel
            // ----------------------------------------------------------------
            Formula::FuelEconomy => FormulaMetadata {
                name: "Fuel Economy",
                description: "Distance travelled per unit of fuel, and fuel per 100 km",
                formula_plain: "economy = distance / fuel; L/100km = 100 * liters / km",
                reference: "EPA fuel economy conventions",
                variables: vec![],
                category: Travel,
                source_module: "mileage.rs",
                source_function: "calculate",
            },
            Formula::FuelCost => FormulaMetadata {
                name: "Trip Fuel Cost",
                description: "Fuel spend for the trip and per distance unit",
                formula_plain: "cost = fuel * price; cost per unit = cost / distance",
                reference: "Arithmetic",
                variables: vec![],
                category: Travel,
                source_module: "mileage.rs",
                source_function: "calculate",
            },
        }
    }

    /// Plain-text formula shortcut
    pub fn plain(&self) -> &'static str {
        self.metadata().formula_plain
    }

    /// Get all formulas in a given category
    pub fn in_category(category: FormulaCategory) -> Vec<Formula> {
        ALL_FORMULAS
            .iter()
            .filter(|f| f.metadata().category == category)
            .copied()
            .collect()
    }
}

/// All formulas in the registry (for iteration)
pub static ALL_FORMULAS: &[Formula] = &[
    Formula::EuclideanDistance,
    Formula::ManhattanDistance,
    Formula::Haversine,
    Formula::InitialBearing,
    Formula::CubeMeasures,
    Formula::RectangularPrismMeasures,
    Formula::SphereMeasures,
    Formula::CylinderMeasures,
    Formula::ConeMeasures,
    Formula::PyramidMeasures,
    Formula::TubeMeasures,
    Formula::MassFromDensity,
    Formula::RectangleArea,
    Formula::TriangleArea,
    Formula::HeronArea,
    Formula::CircleArea,
    Formula::EllipseArea,
    Formula::TrapezoidArea,
    Formula::ParallelogramArea,
    Formula::SectorArea,
    Formula::Slope,
    Formula::SlopeAngle,
    Formula::PercentGrade,
    Formula::BondPrice,
    Formula::AccruedInterest,
    Formula::MacaulayDuration,
    Formula::ModifiedDuration,
    Formula::Convexity,
    Formula::CurrentYield,
    Formula::Cagr,
    Formula::ArithmeticMean,
    Formula::StandardDeviation,
    Formula::SharpeRatio,
    Formula::MaxDrawdown,
    Formula::ProgressiveTax,
    Formula::SocialSecurityTax,
    Formula::MedicareTax,
    Formula::GrossUp,
    Formula::InflationFutureCost,
    Formula::InflationPurchasingPower,
    Formula::FisherRealReturn,
    Formula::MifflinStJeor,
    Formula::HarrisBenedict,
    Formula::TotalDailyEnergy,
    Formula::MacroGrams,
    Formula::BodyMassIndex,
    Formula::ProportionSampleSize,
    Formula::FinitePopulationCorrection,
    Formula::PowerOneSampleMean,
    Formula::PowerTwoSampleMeans,
    Formula::PowerTwoProportions,
    Formula::ExponentialDecay,
    Formula::DecayConstants,
    Formula::LinearInequality,
    Formula::QuadraticFormula,
    Formula::AbsoluteValueInequality,
    Formula::FuelEconomy,
    Formula::FuelCost,
];

// ============================================================================
// Markdown Generation for FORMULAS.md
// ============================================================================

/// Generate the FORMULAS.md reference document.
///
/// Lists every formula in the registry grouped by category, with its plain
/// formula, variables, reference and implementing function. Pass a category
/// to restrict the output to one section.
///
/// # Example
///
/// ```rust
/// use calc_core::formulas::generate_formulas_markdown;
///
/// let markdown = generate_formulas_markdown(None);
/// assert!(markdown.contains("Formulary Formula Reference"));
/// assert!(markdown.contains("## Finance"));
/// ```
pub fn generate_formulas_markdown(only: Option<FormulaCategory>) -> String {
    let mut output = String::with_capacity(24_000);

    output.push_str(
        r#"# Formulary Formula Reference

> **Auto-generated from source code. Do not edit manually.**
>
> Regenerate with: `cargo run --bin gen-formulas`

Every calculator evaluates one or more of the closed-form formulas below.
Rates shown as `y`, `i` or `rate` are fractions unless stated otherwise.

---

"#,
    );

    for category in FormulaCategory::ALL {
        if only.is_some_and(|c| c != category) {
            continue;
        }
        let formulas = Formula::in_category(category);
        if formulas.is_empty() {
            continue;
        }

        output.push_str(&format!("## {}\n\n", category.display_name()));

        for formula in formulas {
            let meta = formula.metadata();
            output.push_str(&format!("### {}\n\n", meta.name));
            output.push_str(&format!("{}\n\n", meta.description));
            output.push_str(&format!("**Formula:** `{}`\n\n", meta.formula_plain));

            if !meta.variables.is_empty() {
                output.push_str("| Symbol | Description | Units |\n");
                output.push_str("|--------|-------------|-------|\n");
                for var in &meta.variables {
                    output.push_str(&format!("| {} | {} | {} |\n", var.symbol, var.description, var.units));
                }
                output.push('\n');
            }

            output.push_str(&format!("**Reference:** {}\n\n", meta.reference));
            output.push_str(&format!(
                "**Source:** `calc_core/src/{}` (`{}`)\n\n",
                meta.source_module, meta.source_function
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_has_no_duplicates() {
        let unique: HashSet<_> = ALL_FORMULAS.iter().collect();
        assert_eq!(unique.len(), ALL_FORMULAS.len());
    }

    #[test]
    fn test_every_category_is_populated() {
        for category in FormulaCategory::ALL {
            assert!(!Formula::in_category(category).is_empty(), "{:?} is empty", category);
        }
    }

    #[test]
    fn test_metadata_is_complete() {
        for formula in ALL_FORMULAS {
            let meta = formula.metadata();
            assert!(!meta.name.is_empty());
            assert!(!meta.formula_plain.is_empty());
            assert!(meta.source_module.ends_with(".rs"));
        }
    }

    #[test]
    fn test_markdown_filter() {
        let md = generate_formulas_markdown(Some(FormulaCategory::Algebra));
        assert!(md.contains("## Algebra"));
        assert!(md.contains("Quadratic Formula"));
        assert!(!md.contains("## Finance"));
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(FormulaCategory::from_str_flexible("finance"), Some(FormulaCategory::Finance));
        assert_eq!(FormulaCategory::from_str_flexible(" Algebra "), Some(FormulaCategory::Algebra));
        assert_eq!(FormulaCategory::from_str_flexible("chemistry"), None);
    }
}
