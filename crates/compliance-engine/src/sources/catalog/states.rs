//! State Layer - registration, tax and labor requirements
//!
//! Covered states: California, Texas, New York, Florida.

use shared_types::{Priority, RuleLevel};

use super::Entry;

const ALL_TYPES: &[&str] = &[];
const ENTITY_TYPES: &[&str] = &["LLC", "Corporation", "S Corporation", "Limited Partnership"];
const FOOD_SERVICE: &[&str] = &["restaurant", "food", "cafe", "catering", "bakery"];
const SELLERS: &[&str] = &["retail", "restaurant", "food", "e-commerce", "wholesale"];

pub(crate) static ENTRIES: &[Entry] = &[
    // California
    Entry {
        key: "ca-sellers-permit",
        title: "Obtain a California seller's permit",
        description: "Businesses selling or leasing tangible personal property in California must hold a seller's permit and file sales and use tax returns with CDTFA.",
        authority: "California Department of Tax and Fee Administration",
        level: RuleLevel::State,
        jurisdiction: "California",
        priority: Priority::Critical,
        cost: 0.0,
        time: "1-3 days",
        initial_deadline: "Before making taxable sales",
        recurring_deadline: Some("Quarterly or as assigned by CDTFA"),
        steps: &[
            (
                "Register online with CDTFA",
                &[("Seller's Permit Application", "https://onlineservices.cdtfa.ca.gov")],
            ),
            ("Collect sales tax and file returns on the assigned schedule", &[]),
        ],
        monetary_penalty: Some(500.0),
        other_penalties: &["Penalty of 10% of tax due for late filing"],
        business_types: ALL_TYPES,
        employees: (None, None),
        industries: Some(SELLERS),
        url: "https://www.cdtfa.ca.gov/taxes-and-fees/sales-use-tax.htm",
        tags: &["tax", "sales tax", "permit"],
    },
    Entry {
        key: "ca-edd-registration",
        title: "Register with the California EDD as an employer",
        description: "Employers paying more than $100 in wages in a quarter must register with the Employment Development Department within 15 days and report payroll taxes (UI, ETT, SDI, PIT).",
        authority: "California Employment Development Department",
        level: RuleLevel::State,
        jurisdiction: "California",
        priority: Priority::Critical,
        cost: 0.0,
        time: "1 day",
        initial_deadline: "Within 15 days of paying over $100 in wages",
        recurring_deadline: Some("Quarterly DE 9 and DE 9C"),
        steps: &[
            (
                "Register through e-Services for Business",
                &[("DE 1", "https://edd.ca.gov/en/payroll_taxes/")],
            ),
            (
                "File quarterly contribution returns",
                &[("DE 9", "https://edd.ca.gov/en/payroll_taxes/forms_and_publications/")],
            ),
        ],
        monetary_penalty: Some(450.0),
        other_penalties: &["Interest and penalties on unpaid contributions"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://edd.ca.gov/en/payroll_taxes/",
        tags: &["payroll", "tax", "registration"],
    },
    Entry {
        key: "ca-harassment-training",
        title: "Provide California sexual harassment prevention training",
        description: "Employers with five or more employees must provide two hours of training to supervisors and one hour to nonsupervisory employees every two years.",
        authority: "California Civil Rights Department",
        level: RuleLevel::State,
        jurisdiction: "California",
        priority: Priority::High,
        cost: 300.0,
        time: "1-2 hours per employee",
        initial_deadline: "Within 6 months of hire or promotion",
        recurring_deadline: Some("Every 2 years"),
        steps: &[
            ("Enroll employees in the free CRD online course or an equivalent", &[]),
            ("Keep training records for two years", &[]),
        ],
        monetary_penalty: None,
        other_penalties: &["Civil Rights Department enforcement actions"],
        business_types: ALL_TYPES,
        employees: (Some(5), None),
        industries: None,
        url: "https://calcivilrights.ca.gov/shpt/",
        tags: &["employment", "training"],
    },
    Entry {
        key: "ca-food-handler",
        title: "Obtain California food handler cards for food employees",
        description: "Food employees involved in preparation, storage or service must obtain an accredited food handler card within 30 days of hire, and each food facility needs a certified food protection manager.",
        authority: "California Department of Public Health",
        level: RuleLevel::State,
        jurisdiction: "California",
        priority: Priority::High,
        cost: 15.0,
        time: "2 hours per employee",
        initial_deadline: "Within 30 days of hire",
        recurring_deadline: Some("Every 3 years"),
        steps: &[
            ("Designate a certified food protection manager", &[]),
            ("Have food employees complete an ANSI-accredited food handler course", &[]),
        ],
        monetary_penalty: Some(500.0),
        other_penalties: &["Health inspection violations"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: Some(FOOD_SERVICE),
        url: "https://www.cdph.ca.gov/Programs/CEH/DFDCS/Pages/FDBPrograms/FoodSafetyProgram.aspx",
        tags: &["food safety", "training"],
    },
    Entry {
        key: "ca-statement-of-information",
        title: "File the California Statement of Information",
        description: "LLCs and corporations registered in California must file a Statement of Information with the Secretary of State within 90 days of formation and then periodically.",
        authority: "California Secretary of State",
        level: RuleLevel::State,
        jurisdiction: "California",
        priority: Priority::Medium,
        cost: 25.0,
        time: "1 hour",
        initial_deadline: "Within 90 days of registration",
        recurring_deadline: Some("Every 2 years for LLCs, annually for corporations"),
        steps: &[(
            "File online through bizfile",
            &[("Form LLC-12", "https://bizfileonline.sos.ca.gov")],
        )],
        monetary_penalty: Some(250.0),
        other_penalties: &["Suspension of the entity"],
        business_types: ENTITY_TYPES,
        employees: (None, None),
        industries: None,
        url: "https://www.sos.ca.gov/business-programs/business-entities/statements",
        tags: &["registration", "annual report"],
    },
    Entry {
        key: "ca-iipp",
        title: "Maintain a Cal/OSHA Injury and Illness Prevention Program",
        description: "Every California employer must establish, implement and maintain a written Injury and Illness Prevention Program.",
        authority: "California Division of Occupational Safety and Health",
        level: RuleLevel::State,
        jurisdiction: "California",
        priority: Priority::High,
        cost: 400.0,
        time: "1 week",
        initial_deadline: "Before employees begin work",
        recurring_deadline: Some("Review annually"),
        steps: &[
            ("Write the IIPP covering the eight required elements", &[]),
            ("Train employees and document inspections", &[]),
        ],
        monetary_penalty: Some(16131.0),
        other_penalties: &["Cal/OSHA citations"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://www.dir.ca.gov/dosh/etools/09-031/",
        tags: &["safety"],
    },
    // Texas
    Entry {
        key: "tx-franchise-tax",
        title: "File the Texas franchise tax report",
        description: "Taxable entities formed or doing business in Texas must file an annual franchise tax report and public information report with the Comptroller.",
        authority: "Texas Comptroller of Public Accounts",
        level: RuleLevel::State,
        jurisdiction: "Texas",
        priority: Priority::Critical,
        cost: 300.0,
        time: "1 day",
        initial_deadline: "May 15",
        recurring_deadline: Some("Annually"),
        steps: &[
            ("Determine whether revenue is under the no-tax-due threshold", &[]),
            (
                "File the franchise tax and public information reports",
                &[("Form 05-102", "https://comptroller.texas.gov/taxes/franchise/forms/")],
            ),
        ],
        monetary_penalty: Some(50.0),
        other_penalties: &["Forfeiture of the right to transact business"],
        business_types: ENTITY_TYPES,
        employees: (None, None),
        industries: None,
        url: "https://comptroller.texas.gov/taxes/franchise/",
        tags: &["tax", "annual report"],
    },
    Entry {
        key: "tx-sales-tax-permit",
        title: "Obtain a Texas sales and use tax permit",
        description: "Businesses selling taxable goods or services in Texas must obtain a sales and use tax permit and collect state and local sales tax.",
        authority: "Texas Comptroller of Public Accounts",
        level: RuleLevel::State,
        jurisdiction: "Texas",
        priority: Priority::Critical,
        cost: 0.0,
        time: "2-3 weeks",
        initial_deadline: "Before making taxable sales",
        recurring_deadline: Some("Monthly, quarterly or annually as assigned"),
        steps: &[(
            "Apply through eSystems",
            &[("Form AP-201", "https://comptroller.texas.gov/taxes/permit/")],
        )],
        monetary_penalty: Some(50.0),
        other_penalties: &["Penalties of up to 10% of tax due"],
        business_types: ALL_TYPES,
        employees: (None, None),
        industries: Some(SELLERS),
        url: "https://comptroller.texas.gov/taxes/sales/",
        tags: &["tax", "sales tax", "permit"],
    },
    Entry {
        key: "tx-twc-registration",
        title: "Register with the Texas Workforce Commission for unemployment tax",
        description: "Employers that pay $1,500 in wages in a quarter or employ workers in 20 weeks of a year must register with TWC and file quarterly wage reports.",
        authority: "Texas Workforce Commission",
        level: RuleLevel::State,
        jurisdiction: "Texas",
        priority: Priority::High,
        cost: 0.0,
        time: "1 day",
        initial_deadline: "Within 10 days of becoming liable",
        recurring_deadline: Some("Quarterly"),
        steps: &[(
            "Register through Unemployment Tax Services",
            &[("Form C-1", "https://www.twc.texas.gov/businesses/unemployment-tax")],
        )],
        monetary_penalty: None,
        other_penalties: &["Penalties and interest on late reports"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://www.twc.texas.gov/businesses/unemployment-tax",
        tags: &["payroll", "tax", "registration"],
    },
    // New York
    Entry {
        key: "ny-certificate-of-authority",
        title: "Obtain a New York sales tax Certificate of Authority",
        description: "Businesses making taxable sales in New York must register for a Certificate of Authority at least 20 days before beginning business.",
        authority: "New York State Department of Taxation and Finance",
        level: RuleLevel::State,
        jurisdiction: "New York",
        priority: Priority::Critical,
        cost: 0.0,
        time: "5 days",
        initial_deadline: "20 days before beginning business",
        recurring_deadline: Some("Quarterly sales tax returns"),
        steps: &[(
            "Register through New York Business Express",
            &[("Form DTF-17", "https://www.tax.ny.gov/bus/st/register.htm")],
        )],
        monetary_penalty: Some(500.0),
        other_penalties: &["Additional $200 per day of sales without authority"],
        business_types: ALL_TYPES,
        employees: (None, None),
        industries: Some(SELLERS),
        url: "https://www.tax.ny.gov/bus/st/register.htm",
        tags: &["tax", "sales tax", "permit"],
    },
    Entry {
        key: "ny-paid-family-leave",
        title: "Provide New York disability and paid family leave coverage",
        description: "Private employers with one or more employees must carry disability benefits and paid family leave insurance.",
        authority: "New York State Workers' Compensation Board",
        level: RuleLevel::State,
        jurisdiction: "New York",
        priority: Priority::High,
        cost: 900.0,
        time: "1 week",
        initial_deadline: "After employing one or more workers for 30 days",
        recurring_deadline: Some("Policy renewal"),
        steps: &[
            ("Purchase a DBL/PFL policy from a licensed carrier", &[]),
            (
                "Post notice of coverage",
                &[("Form DB-120.1", "https://www.wcb.ny.gov/content/main/forms/AllForms.jsp")],
            ),
        ],
        monetary_penalty: Some(1000.0),
        other_penalties: &["Stop-work orders"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://paidfamilyleave.ny.gov/employers",
        tags: &["benefits", "insurance", "employment"],
    },
    Entry {
        key: "ny-harassment-training",
        title: "Adopt a New York sexual harassment prevention policy and annual training",
        description: "All New York employers must adopt a compliant sexual harassment prevention policy and provide interactive training to every employee annually.",
        authority: "New York State Division of Human Rights",
        level: RuleLevel::State,
        jurisdiction: "New York",
        priority: Priority::High,
        cost: 200.0,
        time: "1 hour per employee",
        initial_deadline: "On hire",
        recurring_deadline: Some("Annually"),
        steps: &[
            ("Adopt the model policy or an equivalent", &[]),
            ("Deliver interactive training to all employees", &[]),
        ],
        monetary_penalty: None,
        other_penalties: &["Ineligibility for state contracts"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://www.ny.gov/combating-sexual-harassment-workplace/employers",
        tags: &["employment", "training"],
    },
    // Florida
    Entry {
        key: "fl-annual-report",
        title: "File the Florida annual report with Sunbiz",
        description: "Corporations and LLCs registered in Florida must file an annual report with the Division of Corporations between January 1 and May 1.",
        authority: "Florida Department of State, Division of Corporations",
        level: RuleLevel::State,
        jurisdiction: "Florida",
        priority: Priority::High,
        cost: 138.75,
        time: "1 hour",
        initial_deadline: "May 1",
        recurring_deadline: Some("Annually"),
        steps: &[(
            "File online at Sunbiz",
            &[("Annual Report", "https://services.sunbiz.org/Filings/AnnualReport/FilingStart")],
        )],
        monetary_penalty: Some(400.0),
        other_penalties: &["Administrative dissolution"],
        business_types: ENTITY_TYPES,
        employees: (None, None),
        industries: None,
        url: "https://dos.fl.gov/sunbiz/manage-business/efile/annual-report/",
        tags: &["registration", "annual report"],
    },
    Entry {
        key: "fl-reemployment-tax",
        title: "Register for Florida reemployment tax",
        description: "Employers that pay $1,500 in wages in a quarter or employ a worker in 20 weeks of a year must register with the Florida Department of Revenue for reemployment tax.",
        authority: "Florida Department of Revenue",
        level: RuleLevel::State,
        jurisdiction: "Florida",
        priority: Priority::High,
        cost: 0.0,
        time: "1 day",
        initial_deadline: "On becoming liable",
        recurring_deadline: Some("Quarterly RT-6"),
        steps: &[(
            "Register online with the Department of Revenue",
            &[("Form RT-6", "https://floridarevenue.com/taxes/taxesfees/Pages/reemployment.aspx")],
        )],
        monetary_penalty: Some(50.0),
        other_penalties: &["Interest on late contributions"],
        business_types: ALL_TYPES,
        employees: (Some(1), None),
        industries: None,
        url: "https://floridarevenue.com/taxes/taxesfees/Pages/reemployment.aspx",
        tags: &["payroll", "tax", "registration"],
    },
    Entry {
        key: "fl-food-service-license",
        title: "Obtain a Florida DBPR public food service establishment license",
        description: "Public food service establishments must be licensed by the Division of Hotels and Restaurants before opening and pass periodic inspections.",
        authority: "Florida Department of Business and Professional Regulation",
        level: RuleLevel::State,
        jurisdiction: "Florida",
        priority: Priority::Critical,
        cost: 350.0,
        time: "2-4 weeks",
        initial_deadline: "Before opening",
        recurring_deadline: Some("Annually"),
        steps: &[
            ("Submit plan review if required", &[]),
            (
                "Apply for the license",
                &[("DBPR HR-7006", "https://www2.myfloridalicense.com/hotels-restaurants/")],
            ),
            ("Pass the opening inspection", &[]),
        ],
        monetary_penalty: Some(1000.0),
        other_penalties: &["Closure orders"],
        business_types: ALL_TYPES,
        employees: (None, None),
        industries: Some(FOOD_SERVICE),
        url: "https://www2.myfloridalicense.com/hotels-restaurants/",
        tags: &["food safety", "license"],
    },
];
